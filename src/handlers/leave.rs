use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{CreateLeaveRequest, LeaveFilter, LeaveRequest, LeaveStatus, ReviewLeaveRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/v1/leave-requests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid date range"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateLeaveRequest>,
) -> AppResult<(StatusCode, Json<LeaveRequest>)> {
    if body.end_date < body.start_date {
        return Err(AppError::Validation(
            "end_date must not be before start_date".to_string(),
        ));
    }
    if body.reason.trim().is_empty() {
        return Err(AppError::Validation("A reason is required".to_string()));
    }

    let request = sqlx::query_as::<_, LeaveRequest>(
        r#"INSERT INTO leave_requests (
            id, employee_id, start_date, end_date, reason, status, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, 'pending', NOW(), NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(auth.id)
    .bind(body.start_date)
    .bind(body.end_date)
    .bind(body.reason.trim())
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// List leave requests, filtered by employee and status.
/// Staff see only their own requests; admins can query anyone's.
#[utoipa::path(
    get,
    path = "/api/v1/leave-requests",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Matching leave requests", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leave_requests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<LeaveFilter>,
) -> AppResult<Json<Vec<LeaveRequest>>> {
    let employee_id = if auth.require_admin().is_ok() {
        filter.employee_id
    } else {
        Some(auth.id)
    };

    let requests = sqlx::query_as::<_, LeaveRequest>(
        r#"SELECT * FROM leave_requests
           WHERE ($1::uuid IS NULL OR employee_id = $1)
             AND ($2::leave_status IS NULL OR status = $2)
           ORDER BY created_at DESC"#,
    )
    .bind(employee_id)
    .bind(filter.status)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(requests))
}

/// Approve or reject a pending leave request.
/// Only approved leave exempts days from payroll deduction scanning.
#[utoipa::path(
    patch,
    path = "/api/v1/leave-requests/{request_id}/review",
    request_body = ReviewLeaveRequest,
    params(("request_id" = Uuid, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Request reviewed", body = LeaveRequest),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Request not found"),
        (status = 422, description = "Request is not pending"),
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn review_leave_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(request_id): Path<Uuid>,
    Json(body): Json<ReviewLeaveRequest>,
) -> AppResult<Json<LeaveRequest>> {
    auth.require_admin()?;

    if body.status == LeaveStatus::Pending {
        return Err(AppError::Validation(
            "Review must set status to approved or rejected".to_string(),
        ));
    }

    let request = sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE id = $1",
    )
    .bind(request_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Leave request {} not found", request_id)))?;

    if request.status != LeaveStatus::Pending {
        return Err(AppError::Conflict(
            "Leave request has already been reviewed".to_string(),
        ));
    }

    let reviewed = sqlx::query_as::<_, LeaveRequest>(
        r#"UPDATE leave_requests
           SET status = $1, reviewed_by = $2, updated_at = NOW()
           WHERE id = $3
           RETURNING *"#,
    )
    .bind(body.status)
    .bind(auth.id)
    .bind(request_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(reviewed))
}
