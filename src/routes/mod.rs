// src/routes/mod.rs

use crate::{
    handlers::{
        employee::{
            create_employee, deactivate_employee, get_employee, list_employees, list_pay_grades,
            login, set_pay_grade,
        },
        leave::{create_leave_request, list_leave_requests, review_leave_request},
        payroll::{
            get_payroll, list_payroll, list_unprocessed, process_payroll, set_payroll_status,
            update_payroll,
        },
        report::{create_report, list_reports},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, patch, post, put},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Auth ─────────────────────────────────────────────
        .route("/auth/login", post(login))
        // ─── Employees ────────────────────────────────────────
        .route("/employees", post(create_employee).get(list_employees))
        .route(
            "/employees/{employee_id}",
            get(get_employee).delete(deactivate_employee),
        )
        .route("/employees/{employee_id}/grade", patch(set_pay_grade))
        .route("/pay-grades", get(list_pay_grades))
        // ─── Daily Reports ────────────────────────────────────
        .route("/reports", post(create_report).get(list_reports))
        // ─── Leave ────────────────────────────────────────────
        .route(
            "/leave-requests",
            post(create_leave_request).get(list_leave_requests),
        )
        .route(
            "/leave-requests/{request_id}/review",
            patch(review_leave_request),
        )
        // ─── Payroll ──────────────────────────────────────────
        .route("/payroll", post(process_payroll).get(list_payroll))
        .route("/payroll/unprocessed", get(list_unprocessed))
        .route(
            "/payroll/{record_id}",
            get(get_payroll).put(update_payroll),
        )
        .route("/payroll/{record_id}/status", patch(set_payroll_status))
}
