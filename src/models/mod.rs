// src/models/mod.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ─── Pay Grades ───────────────────────────────────────────────────────────────

/// Rank on the company salary ladder. Each grade maps to a fixed monthly base
/// salary in VND; the table is static, not a database entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "pay_grade", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayGrade {
    Intern,
    Junior,
    Intermediate,
    Senior,
    Lead,
    Manager,
}

impl PayGrade {
    pub fn base_salary(&self) -> Decimal {
        match self {
            PayGrade::Intern => dec!(0),
            PayGrade::Junior => dec!(8000000),
            PayGrade::Intermediate => dec!(12000000),
            PayGrade::Senior => dec!(18000000),
            PayGrade::Lead => dec!(25000000),
            PayGrade::Manager => dec!(32000000),
        }
    }

    pub fn all() -> [PayGrade; 6] {
        [
            PayGrade::Intern,
            PayGrade::Junior,
            PayGrade::Intermediate,
            PayGrade::Senior,
            PayGrade::Lead,
            PayGrade::Manager,
        ]
    }
}

/// One row of the salary ladder as shown to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayGradeInfo {
    pub grade: PayGrade,
    pub base_salary: Decimal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "employee_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Staff,
}

// ─── Employees ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub pay_grade: PayGrade,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct EmployeePublic {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub pay_grade: PayGrade,
    pub role: Role,
}

impl From<Employee> for EmployeePublic {
    fn from(e: Employee) -> Self {
        EmployeePublic {
            id: e.id,
            full_name: e.full_name,
            email: e.email,
            department: e.department,
            pay_grade: e.pay_grade,
            role: e.role,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEmployeeRequest {
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub pay_grade: PayGrade,
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPayGradeRequest {
    pub pay_grade: PayGrade,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub employee: EmployeePublic,
}

// ─── Daily Reports ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DailyReport {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Snapshot of the author's email at filing time; payroll scans match
    /// reports by this column.
    pub email: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReportRequest {
    pub content: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportFilter {
    /// Restrict to one employee (admins only; staff always see their own)
    pub employee_id: Option<Uuid>,
    /// Earliest filing date, inclusive
    pub from: Option<NaiveDate>,
    /// Latest filing date, inclusive
    pub to: Option<NaiveDate>,
}

// ─── Leave Requests ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "leave_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub reviewed_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeaveRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaveFilter {
    pub employee_id: Option<Uuid>,
    pub status: Option<LeaveStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewLeaveRequest {
    /// `approved` or `rejected`
    pub status: LeaveStatus,
}

// ─── Payroll ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, ToSchema, PartialEq, Eq)]
#[sqlx(type_name = "payroll_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    Pending,
    Approved,
    Paid,
}

impl PayrollStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayrollStatus::Pending => "pending",
            PayrollStatus::Approved => "approved",
            PayrollStatus::Paid => "paid",
        }
    }
}

/// One bonus or penalty line on a payroll record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct PayLineItem {
    pub amount: Decimal,
    pub reason: String,
}

pub fn line_total(items: &[PayLineItem]) -> Decimal {
    items.iter().map(|i| i.amount).sum()
}

/// Fixed allowance categories paid on top of base salary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Allowances {
    pub meal: Decimal,
    pub transport: Decimal,
    pub phone: Decimal,
    pub other: Decimal,
}

impl Allowances {
    pub fn total(&self) -> Decimal {
        self.meal + self.transport + self.phone + self.other
    }

    pub fn is_valid(&self) -> bool {
        self.meal >= dec!(0)
            && self.transport >= dec!(0)
            && self.phone >= dec!(0)
            && self.other >= dec!(0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    Leave,
    Unreported,
}

/// One scanned calendar day that reduced pay. Recomputed from scratch on every
/// payroll computation, never diffed against a previous run.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct DeductionDetail {
    pub date: NaiveDate,
    pub kind: DeductionKind,
    pub amount: Decimal,
    pub weekday: String,
}

/// One payroll record per (employee, month, year). Employee display fields are
/// copied at creation time, not live-linked.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PayrollRecord {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub employee_email: String,
    pub department: String,
    pub period_month: i32,
    pub period_year: i32,
    pub base_salary: Decimal,
    #[schema(value_type = Vec<PayLineItem>)]
    pub bonuses: Json<Vec<PayLineItem>>,
    #[schema(value_type = Vec<PayLineItem>)]
    pub penalties: Json<Vec<PayLineItem>>,
    pub allowance_meal: Decimal,
    pub allowance_transport: Decimal,
    pub allowance_phone: Decimal,
    pub allowance_other: Decimal,
    pub insurance_opt_in: bool,
    pub tax_opt_in: bool,
    pub health_insurance: Decimal,
    pub social_insurance: Decimal,
    pub unemployment_insurance: Decimal,
    pub income_tax: Decimal,
    pub deduction_days: i32,
    pub deduction_amount: Decimal,
    #[schema(value_type = Vec<DeductionDetail>)]
    pub deduction_details: Json<Vec<DeductionDetail>>,
    pub gross_income: Decimal,
    pub net_pay: Decimal,
    pub status: PayrollStatus,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessPayrollRequest {
    pub employee_id: Uuid,
    /// 1-12
    pub month: u32,
    pub year: i32,
    #[serde(default)]
    pub bonuses: Vec<PayLineItem>,
    #[serde(default)]
    pub penalties: Vec<PayLineItem>,
    pub allowances: Allowances,
    pub insurance_opt_in: bool,
    pub tax_opt_in: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePayrollRequest {
    #[serde(default)]
    pub bonuses: Vec<PayLineItem>,
    #[serde(default)]
    pub penalties: Vec<PayLineItem>,
    pub allowances: Allowances,
    pub insurance_opt_in: bool,
    pub tax_opt_in: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PeriodQuery {
    /// 1-12
    pub month: u32,
    pub year: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPayrollStatusRequest {
    pub status: PayrollStatus,
}

// ─── JWT Claims ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pay_grade_salaries_are_non_negative() {
        for grade in PayGrade::all() {
            assert!(grade.base_salary() >= dec!(0), "{grade:?} salary negative");
        }
    }

    #[test]
    fn lowest_grade_is_zero() {
        assert_eq!(PayGrade::Intern.base_salary(), dec!(0));
    }

    #[test]
    fn allowance_total_sums_all_categories() {
        let a = Allowances {
            meal: dec!(500000),
            transport: dec!(300000),
            phone: dec!(100000),
            other: dec!(100000),
        };
        assert_eq!(a.total(), dec!(1000000));
        assert!(a.is_valid());
    }

    #[test]
    fn negative_allowance_is_invalid() {
        let a = Allowances {
            meal: dec!(-1),
            transport: dec!(0),
            phone: dec!(0),
            other: dec!(0),
        };
        assert!(!a.is_valid());
    }
}
