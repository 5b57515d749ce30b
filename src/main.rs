use axum::{Router, routing::get};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod errors;
mod handlers;
mod models;
mod openapi;
mod routes;
mod services;
mod state;

use config::Config;
use handlers::general::{health_handler, root_handler};
use models::{PayGrade, Role};
use openapi::ApiDoc;
use routes::api_routes;
use state::AppState;

#[tokio::main]
async fn main() {
    // ─── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("company_payroll=debug,tower_http=info")),
        )
        .init();

    // ─── Config ───────────────────────────────────────────────────────────────
    let config = Config::from_env();
    let addr = config.server_addr();

    // ─── Database ─────────────────────────────────────────────────────────────
    let db = PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run database migrations");

    info!("Database connected and migrations applied");

    ensure_bootstrap_admin(&db, &config).await;

    // ─── App State ────────────────────────────────────────────────────────────
    let state = AppState::new(db, config);

    // ─── Router ───────────────────────────────────────────────────────────────
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api/v1", api_routes())
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // ─── Start Server ─────────────────────────────────────────────────────────
    info!("Company Payroll API listening on http://{}", addr);
    info!("Swagger UI: http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app).await.expect("Server failed");
}

/// Create the first admin account from BOOTSTRAP_ADMIN_EMAIL/_PASSWORD when
/// the directory has no admin yet. Without one there is no way to log in and
/// add employees on a fresh database.
async fn ensure_bootstrap_admin(db: &PgPool, config: &Config) {
    let has_admin = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE role = 'admin' AND is_active = true)",
    )
    .fetch_one(db)
    .await
    .expect("Failed to check for an admin account");

    if has_admin {
        return;
    }

    let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.clone(),
        config.bootstrap_admin_password.clone(),
    ) else {
        warn!(
            "No admin account exists and BOOTSTRAP_ADMIN_EMAIL/BOOTSTRAP_ADMIN_PASSWORD \
             are not set; logins will fail until one is created"
        );
        return;
    };

    let password_hash =
        bcrypt::hash(&password, bcrypt::DEFAULT_COST).expect("Failed to hash bootstrap password");

    sqlx::query(
        r#"INSERT INTO employees (
            id, full_name, email, department, pay_grade, role,
            password_hash, is_active, created_at, updated_at
        ) VALUES ($1, 'Administrator', $2, 'Operations', $3, $4, $5, true, NOW(), NOW())
        ON CONFLICT (email) DO NOTHING"#,
    )
    .bind(uuid::Uuid::new_v4())
    .bind(&email)
    .bind(PayGrade::Manager)
    .bind(Role::Admin)
    .bind(&password_hash)
    .execute(db)
    .await
    .expect("Failed to create bootstrap admin");

    info!("Bootstrap admin account created for {}", email);
}
