use crate::{
    auth::{AuthUser, generate_token},
    errors::{AppError, AppResult},
    models::{
        AuthResponse, CreateEmployeeRequest, Employee, EmployeePublic, LoginRequest, PayGrade,
        PayGradeInfo, SetPayGradeRequest,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bcrypt::{DEFAULT_COST, hash, verify};
use uuid::Uuid;

/// Login with company email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let employee = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE email = $1 AND is_active = true",
    )
    .bind(&body.email)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = verify(&body.password, &employee.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = generate_token(
        &employee,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        employee: employee.into(),
    }))
}

/// The salary ladder: every pay grade and its fixed monthly base salary
#[utoipa::path(
    get,
    path = "/api/v1/pay-grades",
    responses((status = 200, description = "Salary ladder", body = Vec<PayGradeInfo>)),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_pay_grades(_auth: AuthUser) -> Json<Vec<PayGradeInfo>> {
    Json(
        PayGrade::all()
            .into_iter()
            .map(|grade| PayGradeInfo {
                grade,
                base_salary: grade.base_salary(),
            })
            .collect(),
    )
}

/// Add a new employee to the directory
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployeeRequest,
    responses(
        (status = 201, description = "Employee created", body = Employee),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Email already in the directory"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn create_employee(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateEmployeeRequest>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    auth.require_admin()?;

    if body.password.len() < 8 {
        return Err(AppError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM employees WHERE email = $1")
        .bind(&body.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Employee with email '{}' already exists",
            body.email
        )));
    }

    let password_hash =
        hash(&body.password, DEFAULT_COST).map_err(|e| AppError::Internal(e.to_string()))?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"INSERT INTO employees (
            id, full_name, email, department, pay_grade, role,
            password_hash, is_active, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, true, NOW(), NOW())
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(&body.full_name)
    .bind(&body.email)
    .bind(&body.department)
    .bind(body.pay_grade)
    .bind(body.role)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// List the employee directory
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    responses(
        (status = 200, description = "Employee directory", body = Vec<EmployeePublic>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn list_employees(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EmployeePublic>>> {
    let employees = sqlx::query_as::<_, EmployeePublic>(
        "SELECT id, full_name, email, department, pay_grade, role
         FROM employees WHERE is_active = true ORDER BY full_name",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(employees))
}

/// Get a single employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee detail", body = Employee),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn get_employee(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
        .bind(employee_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Move an employee to a different pay grade
#[utoipa::path(
    patch,
    path = "/api/v1/employees/{employee_id}/grade",
    request_body = SetPayGradeRequest,
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Pay grade updated", body = Employee),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn set_pay_grade(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
    Json(body): Json<SetPayGradeRequest>,
) -> AppResult<Json<Employee>> {
    auth.require_admin()?;

    let employee = sqlx::query_as::<_, Employee>(
        r#"UPDATE employees SET pay_grade = $1, updated_at = NOW()
           WHERE id = $2 AND is_active = true
           RETURNING *"#,
    )
    .bind(body.pay_grade)
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Deactivate (soft-delete) an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(("employee_id" = Uuid, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee deactivated"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Employees"
)]
pub async fn deactivate_employee(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(employee_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    auth.require_admin()?;

    let result =
        sqlx::query("UPDATE employees SET is_active = false, updated_at = NOW() WHERE id = $1")
            .bind(employee_id)
            .execute(&state.db)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            employee_id
        )));
    }

    Ok(Json(
        serde_json::json!({ "message": "Employee deactivated successfully" }),
    ))
}
