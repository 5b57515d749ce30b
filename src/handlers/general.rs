use crate::state::AppState;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde_json::json;

/// Root handler — returns an HTML landing page with project info and links
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Company Payroll API</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; min-height: 100vh; padding: 40px 20px; }
    .container { max-width: 760px; margin: 0 auto; }
    header { text-align: center; margin-bottom: 40px; }
    header h1 { font-size: 2.4rem; font-weight: 800; background: linear-gradient(135deg, #22c55e, #3b82f6); -webkit-background-clip: text; -webkit-text-fill-color: transparent; margin-bottom: 8px; }
    header p { color: #94a3b8; font-size: 1.05rem; }
    .badge { display: inline-block; background: #1e293b; border: 1px solid #334155; color: #38bdf8; padding: 4px 12px; border-radius: 20px; font-size: 0.8rem; margin-top: 12px; }
    .routes { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 24px; }
    .routes h2 { font-size: 1.1rem; font-weight: 700; color: #f1f5f9; margin-bottom: 16px; }
    .route-group { margin-bottom: 18px; }
    .route-group h4 { font-size: 0.8rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.1em; color: #64748b; margin-bottom: 8px; }
    .route-item { display: flex; gap: 12px; padding: 6px 0; border-bottom: 1px solid #0f172a; }
    .route-item:last-child { border-bottom: none; }
    .method { font-size: 0.7rem; font-weight: 700; padding: 2px 8px; border-radius: 4px; min-width: 52px; text-align: center; font-family: monospace; }
    .get { background: #064e3b; color: #34d399; }
    .post { background: #1e3a5f; color: #60a5fa; }
    .put, .patch { background: #451a03; color: #fb923c; }
    .delete { background: #4c0519; color: #fb7185; }
    .route-path { font-family: monospace; font-size: 0.85rem; color: #e2e8f0; }
    footer { text-align: center; margin-top: 32px; color: #475569; font-size: 0.85rem; }
    footer a { color: #38bdf8; }
  </style>
</head>
<body>
<div class="container">
  <header>
    <h1>Company Payroll API</h1>
    <p>Employee directory, daily reports, leave and monthly payroll processing</p>
    <span class="badge">v0.1.0 · REST API · JSON</span>
  </header>

  <div class="routes">
    <h2>API Routes</h2>

    <div class="route-group">
      <h4>Auth &amp; Employees</h4>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/auth/login</span></div>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/employees</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/employees</span></div>
      <div class="route-item"><span class="method patch">PATCH</span><span class="route-path">/api/v1/employees/:id/grade</span></div>
      <div class="route-item"><span class="method delete">DELETE</span><span class="route-path">/api/v1/employees/:id</span></div>
    </div>

    <div class="route-group">
      <h4>Daily Reports &amp; Leave</h4>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/reports</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/reports</span></div>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/leave-requests</span></div>
      <div class="route-item"><span class="method patch">PATCH</span><span class="route-path">/api/v1/leave-requests/:id/review</span></div>
    </div>

    <div class="route-group">
      <h4>Payroll</h4>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/payroll</span></div>
      <div class="route-item"><span class="method put">PUT</span><span class="route-path">/api/v1/payroll/:id</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/payroll?month=&amp;year=</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/payroll/unprocessed</span></div>
      <div class="route-item"><span class="method patch">PATCH</span><span class="route-path">/api/v1/payroll/:id/status</span></div>
    </div>
  </div>

  <footer>
    <p>Swagger UI at <a href="/docs">/docs</a> · Health at <a href="/health">/health</a></p>
  </footer>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": "company-payroll",
                "version": "0.1.0"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}
