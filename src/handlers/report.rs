use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{CreateReportRequest, DailyReport, ReportFilter},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

/// File today's activity report. One report per employee per day; days without
/// a report (and without approved leave) are deducted at payroll time.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = CreateReportRequest,
    responses(
        (status = 201, description = "Report filed", body = DailyReport),
        (status = 409, description = "Already filed a report today"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Daily Reports"
)]
pub async fn create_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateReportRequest>,
) -> AppResult<(StatusCode, Json<DailyReport>)> {
    if body.content.trim().is_empty() {
        return Err(AppError::Validation(
            "Report content cannot be empty".to_string(),
        ));
    }

    let email = sqlx::query_scalar::<_, String>(
        "SELECT email FROM employees WHERE id = $1 AND is_active = true",
    )
    .bind(auth.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::Forbidden("No active employee profile".to_string()))?;

    let today = Utc::now().date_naive();
    let already_filed = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM daily_reports
            WHERE employee_id = $1 AND created_at::date = $2
        )",
    )
    .bind(auth.id)
    .bind(today)
    .fetch_one(&state.db)
    .await?;

    if already_filed {
        return Err(AppError::Conflict(
            "Already filed a report today".to_string(),
        ));
    }

    let report = sqlx::query_as::<_, DailyReport>(
        r#"INSERT INTO daily_reports (id, employee_id, email, content, created_at)
           VALUES ($1, $2, $3, $4, NOW())
           RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(auth.id)
    .bind(&email)
    .bind(body.content.trim())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

/// List daily reports, filtered by employee and filing date.
/// Staff see only their own reports; admins can query anyone's.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportFilter),
    responses(
        (status = 200, description = "Matching reports", body = Vec<DailyReport>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Daily Reports"
)]
pub async fn list_reports(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<DailyReport>>> {
    let employee_id = if auth.require_admin().is_ok() {
        filter.employee_id
    } else {
        Some(auth.id)
    };

    let reports = sqlx::query_as::<_, DailyReport>(
        r#"SELECT * FROM daily_reports
           WHERE ($1::uuid IS NULL OR employee_id = $1)
             AND ($2::date IS NULL OR created_at::date >= $2)
             AND ($3::date IS NULL OR created_at::date <= $3)
           ORDER BY created_at DESC"#,
    )
    .bind(employee_id)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(reports))
}
