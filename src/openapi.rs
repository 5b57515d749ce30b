// src/openapi.rs

use crate::models::{
    Allowances, AuthResponse, CreateEmployeeRequest, CreateLeaveRequest, CreateReportRequest,
    DailyReport, DeductionDetail, DeductionKind, Employee, EmployeePublic, LeaveRequest,
    LeaveStatus, LoginRequest, PayGrade, PayGradeInfo, PayLineItem, PayrollRecord, PayrollStatus,
    ProcessPayrollRequest, ReviewLeaveRequest, Role, SetPayGradeRequest, SetPayrollStatusRequest,
    UpdatePayrollRequest,
};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Company Payroll API",
        version = "0.1.0",
        description = "Internal company-management backend built with Rust and Axum. \
            Covers the employee directory, daily activity reports, leave requests, \
            and monthly payroll processing with progressive income tax, statutory \
            insurance and unreported-day deductions.",
        license(name = "MIT")
    ),
    paths(
        // Auth & Employees
        crate::handlers::employee::login,
        crate::handlers::employee::create_employee,
        crate::handlers::employee::list_employees,
        crate::handlers::employee::get_employee,
        crate::handlers::employee::set_pay_grade,
        crate::handlers::employee::deactivate_employee,
        crate::handlers::employee::list_pay_grades,
        // Daily Reports
        crate::handlers::report::create_report,
        crate::handlers::report::list_reports,
        // Leave
        crate::handlers::leave::create_leave_request,
        crate::handlers::leave::list_leave_requests,
        crate::handlers::leave::review_leave_request,
        // Payroll
        crate::handlers::payroll::process_payroll,
        crate::handlers::payroll::update_payroll,
        crate::handlers::payroll::list_payroll,
        crate::handlers::payroll::list_unprocessed,
        crate::handlers::payroll::get_payroll,
        crate::handlers::payroll::set_payroll_status,
    ),
    components(
        schemas(
            LoginRequest, AuthResponse,
            CreateEmployeeRequest, SetPayGradeRequest, Employee, EmployeePublic,
            PayGrade, PayGradeInfo, Role,
            CreateReportRequest, DailyReport,
            CreateLeaveRequest, ReviewLeaveRequest, LeaveRequest, LeaveStatus,
            ProcessPayrollRequest, UpdatePayrollRequest, SetPayrollStatusRequest,
            PayrollRecord, PayrollStatus, PayLineItem, Allowances,
            DeductionDetail, DeductionKind,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Auth", description = "Login and token issuance"),
        (name = "Employees", description = "Employee directory and pay grades"),
        (name = "Daily Reports", description = "File and browse daily activity reports"),
        (name = "Leave", description = "Submit and review leave requests"),
        (name = "Payroll", description = "Process and track monthly payroll"),
    )
)]
pub struct ApiDoc;
