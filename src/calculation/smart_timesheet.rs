//! Smart timesheet hours.
//!
//! Decides whether a shift is paid for the time actually worked or capped
//! at the booked time, based on when completion was submitted:
//!
//! - submitted before the scheduled end: pay up to the submission (`actual`)
//! - submitted at or after the scheduled end: pay the scheduled duration
//!   (`scheduled`), so a late submission can never inflate hours
//!
//! Either way the paid hours never exceed the scheduled duration.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::PaymentMethod;

use super::break_policy::unpaid_break_minutes;
use super::money::{minutes_to_hours, round_hours, round_to_cents};

/// Paid hours for one shift and how they were derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartHours {
    /// End time used for payment.
    pub actual_end: NaiveDateTime,
    /// Minutes from scheduled start to `actual_end`.
    pub raw_minutes: i64,
    /// Unpaid break deducted.
    pub break_minutes: i64,
    /// Paid minutes, never negative. Pay is computed from these.
    pub paid_minutes: i64,
    /// Paid hours rounded to 2 dp, for display and storage.
    pub total_hours: Decimal,
    /// Which duration was paid.
    pub payment_method: PaymentMethod,
    /// Human-readable reasoning.
    pub explanation: String,
}

/// Computes paid hours from the schedule and the submission time.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::calculate_smart_hours;
/// use settlement_engine::models::PaymentMethod;
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let hours = calculate_smart_hours(
///     at("2026-01-15 09:00:00"),
///     at("2026-01-15 17:00:00"),
///     at("2026-01-15 16:00:00"),
/// );
/// assert_eq!(hours.raw_minutes, 420);
/// assert_eq!(hours.break_minutes, 45);
/// assert_eq!(hours.total_hours, Decimal::new(625, 2));
/// assert_eq!(hours.payment_method, PaymentMethod::Actual);
/// ```
pub fn calculate_smart_hours(
    scheduled_start: NaiveDateTime,
    scheduled_end: NaiveDateTime,
    submitted_at: NaiveDateTime,
) -> SmartHours {
    let is_early = submitted_at < scheduled_end;
    let (actual_end, payment_method) = if is_early {
        (submitted_at, PaymentMethod::Actual)
    } else {
        (scheduled_end, PaymentMethod::Scheduled)
    };

    let raw_minutes = (actual_end - scheduled_start).num_minutes();
    let break_minutes = unpaid_break_minutes(raw_minutes);
    let paid_minutes = (raw_minutes - break_minutes).max(0);
    let total_hours = round_hours(minutes_to_hours(paid_minutes));

    let explanation = if is_early {
        format!(
            "Submitted at {} before scheduled end {}: paid for actual time, {} min less {} min break = {} h",
            submitted_at.format("%H:%M"),
            scheduled_end.format("%H:%M"),
            raw_minutes,
            break_minutes,
            total_hours.normalize()
        )
    } else {
        format!(
            "Submitted at {} on or after scheduled end {}: paid for scheduled time, {} min less {} min break = {} h",
            submitted_at.format("%H:%M"),
            scheduled_end.format("%H:%M"),
            raw_minutes,
            break_minutes,
            total_hours.normalize()
        )
    };

    SmartHours {
        actual_end,
        raw_minutes,
        break_minutes,
        paid_minutes,
        total_hours,
        payment_method,
        explanation,
    }
}

/// Gross pay for paid minutes at an hourly rate, rounded to cents.
///
/// Uses the exact hours, not the 2 dp figure shown on the entry.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::gross_pay;
/// use rust_decimal::Decimal;
///
/// // 100 minutes is 1.666.. h, shown as 1.67 h
/// assert_eq!(gross_pay(100, Decimal::new(2423, 2)), Decimal::new(4038, 2));
/// ```
pub fn gross_pay(paid_minutes: i64, hourly_rate: Decimal) -> Decimal {
    round_to_cents(minutes_to_hours(paid_minutes.max(0)) * hourly_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2026-01-15 {}", time), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    #[test]
    fn test_scenario_c_early_submission_pays_actual() {
        let hours = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("16:00:00"));
        assert_eq!(hours.actual_end, at("16:00:00"));
        assert_eq!(hours.raw_minutes, 420);
        assert_eq!(hours.break_minutes, 45);
        assert_eq!(hours.total_hours, dec("6.25"));
        assert_eq!(hours.payment_method, PaymentMethod::Actual);
    }

    #[test]
    fn test_scenario_d_late_submission_pays_scheduled() {
        let hours = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("18:00:00"));
        assert_eq!(hours.actual_end, at("17:00:00"));
        assert_eq!(hours.raw_minutes, 480);
        assert_eq!(hours.break_minutes, 45);
        assert_eq!(hours.total_hours, dec("7.25"));
        assert_eq!(hours.payment_method, PaymentMethod::Scheduled);
    }

    #[test]
    fn test_submission_exactly_at_end_is_scheduled() {
        let hours = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("17:00:00"));
        assert_eq!(hours.payment_method, PaymentMethod::Scheduled);
        assert_eq!(hours.total_hours, dec("7.25"));
    }

    #[test]
    fn test_submission_before_start_pays_nothing() {
        let hours = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("08:00:00"));
        assert_eq!(hours.payment_method, PaymentMethod::Actual);
        assert_eq!(hours.raw_minutes, -60);
        assert_eq!(hours.break_minutes, 0);
        assert_eq!(hours.total_hours, Decimal::ZERO);
    }

    #[test]
    fn test_short_shift_has_no_break() {
        let hours = calculate_smart_hours(at("09:00:00"), at("12:00:00"), at("12:30:00"));
        assert_eq!(hours.break_minutes, 0);
        assert_eq!(hours.total_hours, dec("3"));
    }

    #[test]
    fn test_explanation_names_the_path() {
        let early = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("16:00:00"));
        assert!(early.explanation.contains("actual time"));
        let late = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("18:00:00"));
        assert!(late.explanation.contains("scheduled time"));
    }

    #[test]
    fn test_gross_pay_rounds_to_cents() {
        assert_eq!(gross_pay(375, dec("35.50")), dec("221.88"));
        assert_eq!(gross_pay(435, dec("40")), dec("290.00"));
    }

    #[test]
    fn test_gross_pay_uses_exact_hours() {
        // 09:00 to 10:40 is 100 minutes with no break
        let hours = calculate_smart_hours(at("09:00:00"), at("17:00:00"), at("10:40:00"));
        assert_eq!(hours.paid_minutes, 100);
        assert_eq!(hours.total_hours, dec("1.67"));
        assert_eq!(gross_pay(hours.paid_minutes, dec("24.23")), dec("40.38"));
    }
}
