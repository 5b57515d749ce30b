// src/handlers/payroll.rs

use crate::{
    auth::AuthUser,
    errors::{AppError, AppResult},
    models::{
        Allowances, Employee, EmployeePublic, PayLineItem, PayrollRecord, PayrollStatus,
        PeriodQuery, ProcessPayrollRequest, SetPayrollStatusRequest, UpdatePayrollRequest,
        line_total,
    },
    services::{
        deductions::{self, DeductionOutcome, PgLeaveCalendar, PgReportLog},
        payroll::{CalculatedPayroll, PayrollInputs, PayrollService},
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use rust_decimal_macros::dec;
use sqlx::types::Json as Jsonb;
use uuid::Uuid;

fn validate_period(month: u32, year: i32) -> AppResult<()> {
    if !(1..=12).contains(&month) {
        return Err(AppError::Validation("month must be 1-12".to_string()));
    }
    if !(2000..=2100).contains(&year) {
        return Err(AppError::Validation("year is out of range".to_string()));
    }
    Ok(())
}

fn validate_line_items(items: &[PayLineItem], label: &str) -> AppResult<()> {
    for item in items {
        if item.amount <= dec!(0) {
            return Err(AppError::Validation(format!(
                "{label} amounts must be greater than zero"
            )));
        }
        if item.reason.trim().is_empty() {
            return Err(AppError::Validation(format!(
                "{label} entries require a reason"
            )));
        }
    }
    Ok(())
}

fn validate_allowances(allowances: &Allowances) -> AppResult<()> {
    if !allowances.is_valid() {
        return Err(AppError::Validation(
            "Allowance amounts cannot be negative".to_string(),
        ));
    }
    Ok(())
}

async fn scan_deductions(
    state: &AppState,
    employee_id: Uuid,
    email: &str,
    base_salary: rust_decimal::Decimal,
    month: u32,
    year: i32,
) -> AppResult<DeductionOutcome> {
    let leave = PgLeaveCalendar::new(state.db.clone());
    let reports = PgReportLog::new(state.db.clone());
    deductions::scan(
        employee_id,
        email,
        base_salary,
        month,
        year,
        Utc::now().date_naive(),
        &leave,
        &reports,
    )
    .await
    .map_err(|e| AppError::Internal(e.to_string()))
}

fn compute(
    base_salary: rust_decimal::Decimal,
    bonuses: &[PayLineItem],
    penalties: &[PayLineItem],
    allowances: &Allowances,
    deduction_amount: rust_decimal::Decimal,
    insurance_opt_in: bool,
    tax_opt_in: bool,
) -> CalculatedPayroll {
    PayrollService::compute(PayrollInputs {
        base_salary,
        total_allowances: allowances.total(),
        net_adjustment: line_total(bonuses) - line_total(penalties),
        deduction_amount,
        insurance_opt_in,
        tax_opt_in,
    })
}

/// Process payroll for one employee for a period. Scans the period's calendar
/// for unreported/leave days, computes insurance, tax and net pay, and stores
/// the record. One record per (employee, month, year).
#[utoipa::path(
    post,
    path = "/api/v1/payroll",
    request_body = ProcessPayrollRequest,
    responses(
        (status = 201, description = "Payroll record created", body = PayrollRecord),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Payroll already processed for this period"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn process_payroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<ProcessPayrollRequest>,
) -> AppResult<(StatusCode, Json<PayrollRecord>)> {
    auth.require_admin()?;
    validate_period(body.month, body.year)?;
    validate_line_items(&body.bonuses, "Bonus")?;
    validate_line_items(&body.penalties, "Penalty")?;
    validate_allowances(&body.allowances)?;

    let employee = sqlx::query_as::<_, Employee>(
        "SELECT * FROM employees WHERE id = $1 AND is_active = true",
    )
    .bind(body.employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", body.employee_id)))?;

    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM payroll_records
         WHERE employee_id = $1 AND period_month = $2 AND period_year = $3",
    )
    .bind(employee.id)
    .bind(body.month as i32)
    .bind(body.year)
    .fetch_optional(&state.db)
    .await?;

    if existing.is_some() {
        return Err(AppError::PayrollAlreadyProcessed);
    }

    let base_salary = employee.pay_grade.base_salary();
    let scan = scan_deductions(
        &state,
        employee.id,
        &employee.email,
        base_salary,
        body.month,
        body.year,
    )
    .await?;

    let calc = compute(
        base_salary,
        &body.bonuses,
        &body.penalties,
        &body.allowances,
        scan.total_amount,
        body.insurance_opt_in,
        body.tax_opt_in,
    );

    let record = sqlx::query_as::<_, PayrollRecord>(
        r#"INSERT INTO payroll_records (
            id, employee_id, employee_name, employee_email, department,
            period_month, period_year, base_salary, bonuses, penalties,
            allowance_meal, allowance_transport, allowance_phone, allowance_other,
            insurance_opt_in, tax_opt_in,
            health_insurance, social_insurance, unemployment_insurance, income_tax,
            deduction_days, deduction_amount, deduction_details,
            gross_income, net_pay, status, created_by, created_at, updated_at
        ) VALUES (
            $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
            $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
            $21, $22, $23, $24, $25, 'pending', $26, NOW(), NOW()
        )
        RETURNING *"#,
    )
    .bind(Uuid::new_v4())
    .bind(employee.id)
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.department)
    .bind(body.month as i32)
    .bind(body.year)
    .bind(base_salary)
    .bind(Jsonb(body.bonuses.clone()))
    .bind(Jsonb(body.penalties.clone()))
    .bind(body.allowances.meal)
    .bind(body.allowances.transport)
    .bind(body.allowances.phone)
    .bind(body.allowances.other)
    .bind(body.insurance_opt_in)
    .bind(body.tax_opt_in)
    .bind(calc.insurance.health)
    .bind(calc.insurance.social)
    .bind(calc.insurance.unemployment)
    .bind(calc.income_tax)
    .bind(scan.total_days)
    .bind(scan.total_amount)
    .bind(Jsonb(scan.details))
    .bind(calc.gross_income)
    .bind(calc.net_pay)
    .bind(auth.id)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Edit a payroll record's inputs and recalculate everything.
/// Deductions are re-scanned from the current leave and report data;
/// the stored employee snapshot and base salary are kept as-is.
#[utoipa::path(
    put,
    path = "/api/v1/payroll/{record_id}",
    request_body = UpdatePayrollRequest,
    params(("record_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Record recalculated", body = PayrollRecord),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Record not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn update_payroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<UpdatePayrollRequest>,
) -> AppResult<Json<PayrollRecord>> {
    auth.require_admin()?;
    validate_line_items(&body.bonuses, "Bonus")?;
    validate_line_items(&body.penalties, "Penalty")?;
    validate_allowances(&body.allowances)?;

    let record =
        sqlx::query_as::<_, PayrollRecord>("SELECT * FROM payroll_records WHERE id = $1")
            .bind(record_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payroll record {} not found", record_id)))?;

    let scan = scan_deductions(
        &state,
        record.employee_id,
        &record.employee_email,
        record.base_salary,
        record.period_month as u32,
        record.period_year,
    )
    .await?;

    let calc = compute(
        record.base_salary,
        &body.bonuses,
        &body.penalties,
        &body.allowances,
        scan.total_amount,
        body.insurance_opt_in,
        body.tax_opt_in,
    );

    let updated = sqlx::query_as::<_, PayrollRecord>(
        r#"UPDATE payroll_records SET
            bonuses = $1, penalties = $2,
            allowance_meal = $3, allowance_transport = $4,
            allowance_phone = $5, allowance_other = $6,
            insurance_opt_in = $7, tax_opt_in = $8,
            health_insurance = $9, social_insurance = $10,
            unemployment_insurance = $11, income_tax = $12,
            deduction_days = $13, deduction_amount = $14, deduction_details = $15,
            gross_income = $16, net_pay = $17, updated_at = NOW()
        WHERE id = $18
        RETURNING *"#,
    )
    .bind(Jsonb(body.bonuses.clone()))
    .bind(Jsonb(body.penalties.clone()))
    .bind(body.allowances.meal)
    .bind(body.allowances.transport)
    .bind(body.allowances.phone)
    .bind(body.allowances.other)
    .bind(body.insurance_opt_in)
    .bind(body.tax_opt_in)
    .bind(calc.insurance.health)
    .bind(calc.insurance.social)
    .bind(calc.insurance.unemployment)
    .bind(calc.income_tax)
    .bind(scan.total_days)
    .bind(scan.total_amount)
    .bind(Jsonb(scan.details))
    .bind(calc.gross_income)
    .bind(calc.net_pay)
    .bind(record_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// List payroll records for a period
#[utoipa::path(
    get,
    path = "/api/v1/payroll",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Records for the period", body = Vec<PayrollRecord>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_payroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<Vec<PayrollRecord>>> {
    auth.require_admin()?;
    validate_period(period.month, period.year)?;

    let records = sqlx::query_as::<_, PayrollRecord>(
        "SELECT * FROM payroll_records
         WHERE period_month = $1 AND period_year = $2
         ORDER BY employee_name",
    )
    .bind(period.month as i32)
    .bind(period.year)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(records))
}

/// Active employees that still have no payroll record for the period —
/// the "needs processing" queue.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/unprocessed",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Employees awaiting payroll", body = Vec<EmployeePublic>),
        (status = 403, description = "Admin only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn list_unprocessed(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<Vec<EmployeePublic>>> {
    auth.require_admin()?;
    validate_period(period.month, period.year)?;

    let employees = sqlx::query_as::<_, EmployeePublic>(
        r#"SELECT id, full_name, email, department, pay_grade, role
           FROM employees e
           WHERE e.is_active = true
             AND NOT EXISTS (
                SELECT 1 FROM payroll_records p
                WHERE p.employee_id = e.id
                  AND p.period_month = $1 AND p.period_year = $2
             )
           ORDER BY full_name"#,
    )
    .bind(period.month as i32)
    .bind(period.year)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(employees))
}

/// Get a single payroll record. Admins see any record; staff only their own.
#[utoipa::path(
    get,
    path = "/api/v1/payroll/{record_id}",
    params(("record_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Payroll record", body = PayrollRecord),
        (status = 404, description = "Record not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn get_payroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<PayrollRecord>> {
    let record =
        sqlx::query_as::<_, PayrollRecord>("SELECT * FROM payroll_records WHERE id = $1")
            .bind(record_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payroll record {} not found", record_id)))?;

    if auth.require_admin().is_err() && record.employee_id != auth.id {
        return Err(AppError::Forbidden(
            "You can only view your own payroll records".to_string(),
        ));
    }

    Ok(Json(record))
}

/// Advance a payroll record's status. The flow is forward-only:
/// pending → approved → paid.
#[utoipa::path(
    patch,
    path = "/api/v1/payroll/{record_id}/status",
    request_body = SetPayrollStatusRequest,
    params(("record_id" = Uuid, Path, description = "Payroll record ID")),
    responses(
        (status = 200, description = "Status updated", body = PayrollRecord),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Record not found"),
        (status = 422, description = "Invalid status transition"),
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn set_payroll_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(body): Json<SetPayrollStatusRequest>,
) -> AppResult<Json<PayrollRecord>> {
    auth.require_admin()?;

    let record =
        sqlx::query_as::<_, PayrollRecord>("SELECT * FROM payroll_records WHERE id = $1")
            .bind(record_id)
            .fetch_optional(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payroll record {} not found", record_id)))?;

    let allowed = matches!(
        (record.status, body.status),
        (PayrollStatus::Pending, PayrollStatus::Approved)
            | (PayrollStatus::Approved, PayrollStatus::Paid)
    );
    if !allowed {
        return Err(AppError::InvalidStatusTransition {
            from: record.status.as_str().to_string(),
            to: body.status.as_str().to_string(),
        });
    }

    let updated = sqlx::query_as::<_, PayrollRecord>(
        "UPDATE payroll_records SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(body.status)
    .bind(record_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}
