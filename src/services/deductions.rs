// src/services/deductions.rs
//
// Calendar scan that turns missing daily reports into per-day salary
// deductions. For every non-Sunday day of the pay period the scanner asks two
// questions, in order: is the employee on approved leave, and if not, did they
// file a report. Leave wins; the report log is not consulted on leave days.

use crate::models::{DeductionDetail, DeductionKind};
use crate::services::tax::round_vnd;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Answers whether an approved leave request covers a given day.
#[async_trait]
pub trait LeaveCalendar: Send + Sync {
    async fn on_approved_leave(&self, employee_id: Uuid, day: NaiveDate) -> Result<bool>;
}

/// Answers whether a daily report was filed on a given day.
#[async_trait]
pub trait ReportLog: Send + Sync {
    async fn has_report(&self, email: &str, day: NaiveDate) -> Result<bool>;
}

pub struct PgLeaveCalendar {
    pool: PgPool,
}

impl PgLeaveCalendar {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveCalendar for PgLeaveCalendar {
    async fn on_approved_leave(&self, employee_id: Uuid, day: NaiveDate) -> Result<bool> {
        let covered = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM leave_requests
                WHERE employee_id = $1
                  AND status = 'approved'
                  AND start_date <= $2
                  AND end_date >= $2
            )",
        )
        .bind(employee_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(covered)
    }
}

pub struct PgReportLog {
    pool: PgPool,
}

impl PgReportLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportLog for PgReportLog {
    async fn has_report(&self, email: &str, day: NaiveDate) -> Result<bool> {
        let day_start = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("invalid day {day}"))?
            .and_utc();
        let next_day_start = day
            .succ_opt()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| anyhow!("no day after {day}"))?
            .and_utc();

        let filed = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM daily_reports
                WHERE email = $1
                  AND created_at >= $2
                  AND created_at < $3
            )",
        )
        .bind(email)
        .bind(day_start)
        .bind(next_day_start)
        .fetch_one(&self.pool)
        .await?;
        Ok(filed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeductionOutcome {
    pub total_days: i32,
    pub total_amount: Decimal,
    pub details: Vec<DeductionDetail>,
}

impl DeductionOutcome {
    pub fn empty() -> Self {
        Self {
            total_days: 0,
            total_amount: dec!(0),
            details: Vec::new(),
        }
    }
}

/// Salary lost per deducted day: `round(base_salary / 26)`. The divisor is a
/// fixed working-day count, independent of the calendar month's length.
pub fn daily_rate(base_salary: Decimal) -> Decimal {
    round_vnd(base_salary / dec!(26))
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| anyhow!("invalid period {year}-{month:02}"))
}

/// Scan the pay period and accrue a deduction for every non-Sunday day that is
/// neither covered by approved leave nor by a filed report.
///
/// When the period is the current month the window ends at `as_of` — payroll
/// only covers days elapsed so far. A lookup failure on a single day is logged
/// and that day accrues nothing (fail open); the scan keeps going so one bad
/// query never over-penalizes an employee or aborts the whole run.
pub async fn scan(
    employee_id: Uuid,
    email: &str,
    base_salary: Decimal,
    month: u32,
    year: i32,
    as_of: NaiveDate,
    leave: &dyn LeaveCalendar,
    reports: &dyn ReportLog,
) -> Result<DeductionOutcome> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("invalid period {year}-{month:02}"))?;
    let mut end = last_day_of_month(year, month)?;
    if as_of.year() == year && as_of.month() == month {
        end = as_of;
    }
    if end < first {
        return Ok(DeductionOutcome::empty());
    }

    let rate = daily_rate(base_salary);
    let mut outcome = DeductionOutcome::empty();

    let mut day = first;
    while day <= end {
        let current = day;
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };

        if current.weekday() == Weekday::Sun {
            continue;
        }

        match leave.on_approved_leave(employee_id, current).await {
            Ok(true) => {
                outcome.details.push(DeductionDetail {
                    date: current,
                    kind: DeductionKind::Leave,
                    amount: rate,
                    weekday: current.weekday().to_string(),
                });
                continue;
            }
            Ok(false) => {}
            Err(e) => {
                warn!(%employee_id, date = %current, error = %e, "leave lookup failed, skipping day");
                continue;
            }
        }

        match reports.has_report(email, current).await {
            Ok(true) => {}
            Ok(false) => {
                outcome.details.push(DeductionDetail {
                    date: current,
                    kind: DeductionKind::Unreported,
                    amount: rate,
                    weekday: current.weekday().to_string(),
                });
            }
            Err(e) => {
                warn!(%employee_id, date = %current, error = %e, "report lookup failed, skipping day");
            }
        }
    }

    outcome.total_days = outcome.details.len() as i32;
    outcome.total_amount = outcome.details.iter().map(|d| d.amount).sum();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct FixedLeave {
        days: HashSet<NaiveDate>,
    }

    #[async_trait]
    impl LeaveCalendar for FixedLeave {
        async fn on_approved_leave(&self, _employee_id: Uuid, day: NaiveDate) -> Result<bool> {
            Ok(self.days.contains(&day))
        }
    }

    struct FixedReports {
        missing: HashSet<NaiveDate>,
        failing: HashSet<NaiveDate>,
        queried: Mutex<Vec<NaiveDate>>,
    }

    impl FixedReports {
        fn with_missing(missing: impl IntoIterator<Item = NaiveDate>) -> Self {
            Self {
                missing: missing.into_iter().collect(),
                failing: HashSet::new(),
                queried: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ReportLog for FixedReports {
        async fn has_report(&self, _email: &str, day: NaiveDate) -> Result<bool> {
            self.queried.lock().unwrap().push(day);
            if self.failing.contains(&day) {
                bail!("report store unavailable");
            }
            Ok(!self.missing.contains(&day))
        }
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    const BASE: Decimal = dec!(10000000);
    const EMP: Uuid = Uuid::nil();

    #[test]
    fn daily_rate_uses_fixed_26_day_divisor() {
        assert_eq!(daily_rate(BASE), dec!(384615));
    }

    #[tokio::test]
    async fn fully_reported_month_accrues_nothing() {
        let leave = FixedLeave { days: HashSet::new() };
        let reports = FixedReports::with_missing([]);
        // June 2025: a completed month relative to as_of
        let out = scan(EMP, "a@co.vn", BASE, 6, 2025, d(2025, 8, 6), &leave, &reports)
            .await
            .unwrap();
        assert_eq!(out, DeductionOutcome::empty());
    }

    #[tokio::test]
    async fn sundays_never_accrue_deductions() {
        let leave = FixedLeave { days: HashSet::new() };
        // No reports at all: every scanned day is unreported
        let missing: Vec<NaiveDate> = (1..=30).map(|day| d(2025, 6, day)).collect();
        let reports = FixedReports::with_missing(missing);
        let out = scan(EMP, "a@co.vn", BASE, 6, 2025, d(2025, 8, 6), &leave, &reports)
            .await
            .unwrap();
        // June 2025 has 30 days, 5 of them Sundays (1, 8, 15, 22, 29)
        assert_eq!(out.total_days, 25);
        assert!(out.details.iter().all(|dd| dd.weekday != "Sun"));
        assert!(!out.details.iter().any(|dd| dd.date == d(2025, 6, 8)));
    }

    #[tokio::test]
    async fn leave_takes_precedence_and_skips_report_lookup() {
        let leave_day = d(2025, 6, 10);
        let leave = FixedLeave { days: HashSet::from([leave_day]) };
        let reports = FixedReports::with_missing([leave_day]);
        let out = scan(EMP, "a@co.vn", BASE, 6, 2025, d(2025, 8, 6), &leave, &reports)
            .await
            .unwrap();

        let entries: Vec<_> = out.details.iter().filter(|dd| dd.date == leave_day).collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DeductionKind::Leave);
        // the report log must not have been consulted for the leave day
        assert!(!reports.queried.lock().unwrap().contains(&leave_day));
    }

    #[tokio::test]
    async fn two_unreported_and_one_leave_day_example() {
        // 2 unreported weekdays + 1 approved-leave weekday
        let leave = FixedLeave { days: HashSet::from([d(2025, 6, 11)]) };
        let reports = FixedReports::with_missing([d(2025, 6, 3), d(2025, 6, 20)]);
        let out = scan(EMP, "a@co.vn", BASE, 6, 2025, d(2025, 8, 6), &leave, &reports)
            .await
            .unwrap();
        assert_eq!(out.total_days, 3);
        assert_eq!(out.total_amount, dec!(1153845));
        let dates: Vec<NaiveDate> = out.details.iter().map(|dd| dd.date).collect();
        assert_eq!(dates, vec![d(2025, 6, 3), d(2025, 6, 11), d(2025, 6, 20)]);
    }

    #[tokio::test]
    async fn current_month_is_clamped_to_today() {
        let leave = FixedLeave { days: HashSet::new() };
        let missing: Vec<NaiveDate> = (1..=30).map(|day| d(2025, 6, day)).collect();
        let reports = FixedReports::with_missing(missing);
        // Pretend today is June 10th: days 11-30 must not be scanned
        let out = scan(EMP, "a@co.vn", BASE, 6, 2025, d(2025, 6, 10), &leave, &reports)
            .await
            .unwrap();
        assert!(out.details.iter().all(|dd| dd.date <= d(2025, 6, 10)));
        // June 1st and 8th are Sundays: 10 − 2 = 8 scanned weekdays
        assert_eq!(out.total_days, 8);
    }

    #[tokio::test]
    async fn lookup_failure_fails_open_and_scan_continues() {
        let leave = FixedLeave { days: HashSet::new() };
        let mut reports = FixedReports::with_missing([d(2025, 6, 3), d(2025, 6, 4)]);
        // the store errors on the 3rd; the 4th must still be scanned
        reports.failing.insert(d(2025, 6, 3));
        let out = scan(EMP, "a@co.vn", BASE, 6, 2025, d(2025, 8, 6), &leave, &reports)
            .await
            .unwrap();
        assert!(!out.details.iter().any(|dd| dd.date == d(2025, 6, 3)));
        assert!(out.details.iter().any(|dd| dd.date == d(2025, 6, 4)));
        assert_eq!(out.total_days, 1);
        assert_eq!(out.total_amount, dec!(384615));
    }

    #[tokio::test]
    async fn invalid_month_is_rejected() {
        let leave = FixedLeave { days: HashSet::new() };
        let reports = FixedReports::with_missing([]);
        let result = scan(EMP, "a@co.vn", BASE, 13, 2025, d(2025, 8, 6), &leave, &reports).await;
        assert!(result.is_err());
    }
}
