//! Timesheet and timesheet entry models.
//!
//! Timesheet totals are derived data: they are always recomputed from the
//! entries and never edited directly.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Approval state of a timesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimesheetStatus {
    /// Open for new entries.
    Draft,
    /// Submitted for approval.
    Submitted,
    /// Approved for payment.
    Approved,
    /// Sent back to the worker.
    Rejected,
    /// Paid out.
    Paid,
}

impl TimesheetStatus {
    /// Settled amounts in approved or paid timesheets are never mutated.
    pub fn is_locked(&self) -> bool {
        matches!(self, TimesheetStatus::Approved | TimesheetStatus::Paid)
    }
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimesheetStatus::Draft => "draft",
            TimesheetStatus::Submitted => "submitted",
            TimesheetStatus::Approved => "approved",
            TimesheetStatus::Rejected => "rejected",
            TimesheetStatus::Paid => "paid",
        };
        f.write_str(label)
    }
}

/// How the paid duration of an entry was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Completion submitted before the scheduled end: pay the time actually worked.
    Actual,
    /// Completion submitted at or after the scheduled end: pay the booked time.
    Scheduled,
    /// Entered by hand.
    Manual,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentMethod::Actual => "actual",
            PaymentMethod::Scheduled => "scheduled",
            PaymentMethod::Manual => "manual",
        };
        f.write_str(label)
    }
}

/// A worker's timesheet for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timesheet {
    /// Unique identifier for the timesheet.
    pub id: String,
    /// The worker.
    pub user_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// First day of the pay period (inclusive).
    pub pay_period_start: NaiveDate,
    /// Last day of the pay period (inclusive).
    pub pay_period_end: NaiveDate,
    /// Approval state.
    pub status: TimesheetStatus,
    /// Sum of entry hours.
    pub total_hours: Decimal,
    /// Sum of entry gross pay.
    pub total_earnings: Decimal,
}

/// One line of a timesheet, usually produced by settling a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimesheetEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// Parent timesheet.
    pub timesheet_id: String,
    /// The settled shift; `None` for manual entries.
    pub shift_id: Option<String>,
    /// Scheduled start of the work.
    pub start_time: NaiveDateTime,
    /// End used for payment.
    pub end_time: NaiveDateTime,
    /// Unpaid break deducted.
    pub break_minutes: i64,
    /// Paid hours.
    pub total_hours: Decimal,
    /// Hourly rate applied.
    pub hourly_rate: Decimal,
    /// hours × rate rounded to cents.
    pub gross_pay: Decimal,
    /// Which duration was paid.
    pub payment_method: PaymentMethod,
    /// When completion was submitted.
    pub submission_timestamp: Option<NaiveDateTime>,
    /// Scheduled end of the shift.
    pub scheduled_end_time: Option<NaiveDateTime>,
    /// Last time the entry was written.
    pub updated_at: DateTime<Utc>,
}

/// Totals derived from a set of entries.
///
/// # Examples
///
/// ```
/// use settlement_engine::models::timesheet_totals;
/// use rust_decimal::Decimal;
///
/// let (hours, earnings) = timesheet_totals(&[]);
/// assert_eq!(hours, Decimal::ZERO);
/// assert_eq!(earnings, Decimal::ZERO);
/// ```
pub fn timesheet_totals(entries: &[TimesheetEntry]) -> (Decimal, Decimal) {
    let hours = entries.iter().map(|e| e.total_hours).sum();
    let earnings = entries.iter().map(|e| e.gross_pay).sum();
    (hours, earnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_entry(hours: &str, gross: &str) -> TimesheetEntry {
        let start = NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        TimesheetEntry {
            id: "entry".to_string(),
            timesheet_id: "ts_001".to_string(),
            shift_id: None,
            start_time: start,
            end_time: start,
            break_minutes: 0,
            total_hours: dec(hours),
            hourly_rate: dec("30.00"),
            gross_pay: dec(gross),
            payment_method: PaymentMethod::Manual,
            submission_timestamp: None,
            scheduled_end_time: None,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_totals_sum_all_entries() {
        let entries = vec![make_entry("6.25", "187.50"), make_entry("7.25", "217.50")];
        let (hours, earnings) = timesheet_totals(&entries);
        assert_eq!(hours, dec("13.50"));
        assert_eq!(earnings, dec("405.00"));
    }

    #[test]
    fn test_locked_statuses() {
        assert!(TimesheetStatus::Approved.is_locked());
        assert!(TimesheetStatus::Paid.is_locked());
        assert!(!TimesheetStatus::Draft.is_locked());
        assert!(!TimesheetStatus::Submitted.is_locked());
        assert!(!TimesheetStatus::Rejected.is_locked());
    }

    #[test]
    fn test_payment_method_serialization() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Actual).unwrap(),
            "\"actual\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(PaymentMethod::Scheduled.to_string(), "scheduled");
    }
}
