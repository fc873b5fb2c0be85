//! Back-fills attendance records for an approved leave span.
//!
//! Every day of the span gets exactly one record with status "leave".
//! The write is a single-statement upsert keyed on the (worker_id, day)
//! unique key: a fresh row gets a synthetic 08:00 clock-in and method
//! "system"; a row already written by a physical clock-in keeps its
//! timestamps and only has its status overwritten. Re-running the whole
//! span is a no-op.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceStatus, VerificationMethod};

/// Start of the business day, used as the synthetic clock-in for
/// system-generated leave records.
const BUSINESS_DAY_START: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(t) => t,
    None => unreachable!(),
};

#[derive(Debug, Serialize, ToSchema)]
pub struct DayFailure {
    #[schema(example = "2024-06-11", value_type = String, format = "date")]
    pub day: NaiveDate,
    #[schema(example = "connection reset")]
    pub error: String,
}

/// Outcome of one materialization pass. Failures are per-day warnings;
/// the approval that triggered the pass stands regardless.
#[derive(Debug, Serialize, ToSchema)]
pub struct Reconciliation {
    #[schema(example = 3)]
    pub days_processed: u32,
    pub failures: Vec<DayFailure>,
}

/// Inclusive day range `start..=end`. Empty when start is after end.
pub fn leave_days(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Ensures one "leave" attendance record per day of the span. Each day
/// is attempted independently; a failed day is collected and the loop
/// moves on, so a flaky store never leaves a prefix of the span
/// unprocessed behind a single bad day.
pub async fn materialize(
    pool: &MySqlPool,
    worker_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Reconciliation {
    let mut outcome = Reconciliation {
        days_processed: 0,
        failures: Vec::new(),
    };

    for day in leave_days(start, end) {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance_records (worker_id, day, clock_in, status, method)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE status = VALUES(status)
            "#,
        )
        .bind(worker_id)
        .bind(day)
        .bind(day.and_time(BUSINESS_DAY_START))
        .bind(AttendanceStatus::Leave.as_str())
        .bind(VerificationMethod::System.as_str())
        .execute(pool)
        .await;

        match result {
            Ok(_) => outcome.days_processed += 1,
            Err(e) => {
                tracing::warn!(error = %e, worker_id, %day, "leave back-fill failed for day");
                outcome.failures.push(DayFailure {
                    day,
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn range_is_inclusive_of_both_ends() {
        let days: Vec<_> = leave_days(date(2024, 6, 10), date(2024, 6, 12)).collect();
        assert_eq!(
            days,
            vec![date(2024, 6, 10), date(2024, 6, 11), date(2024, 6, 12)]
        );
    }

    #[test]
    fn single_day_span_yields_one_day() {
        let days: Vec<_> = leave_days(date(2024, 6, 10), date(2024, 6, 10)).collect();
        assert_eq!(days, vec![date(2024, 6, 10)]);
    }

    #[test]
    fn inverted_span_yields_nothing() {
        assert_eq!(leave_days(date(2024, 6, 12), date(2024, 6, 10)).count(), 0);
    }

    #[test]
    fn range_crosses_month_boundaries() {
        let days: Vec<_> = leave_days(date(2024, 2, 28), date(2024, 3, 1)).collect();
        assert_eq!(
            days,
            vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]
        );
    }

    #[test]
    fn synthetic_clock_in_is_start_of_business_day() {
        let ts = date(2024, 6, 10).and_time(BUSINESS_DAY_START);
        assert_eq!(ts.to_string(), "2024-06-10 08:00:00");
    }
}
