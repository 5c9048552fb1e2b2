//! Pay period model.
//!
//! Pay periods are fixed-length windows counted from an anchor date, so any
//! date maps to exactly one period.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Represents a pay period date range.
///
/// # Example
///
/// ```
/// use settlement_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let anchor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let period = PayPeriod::containing(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(), anchor, 14);
///
/// assert_eq!(period.start_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
/// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Returns the period of `length_days` days containing `date`.
    ///
    /// Works for dates before the anchor as well. A zero length is treated
    /// as a single day.
    pub fn containing(date: NaiveDate, anchor: NaiveDate, length_days: u32) -> Self {
        let length = i64::from(length_days.max(1));
        let offset = (date - anchor).num_days().div_euclid(length);
        let start_date = anchor + Duration::days(offset * length);
        let end_date = start_date + Duration::days(length - 1);
        Self {
            start_date,
            end_date,
        }
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_anchor_day_starts_a_period() {
        let period = PayPeriod::containing(make_date("2024-01-01"), make_date("2024-01-01"), 14);
        assert_eq!(period.start_date, make_date("2024-01-01"));
        assert_eq!(period.end_date, make_date("2024-01-14"));
    }

    #[test]
    fn test_last_day_of_period_stays_in_period() {
        let period = PayPeriod::containing(make_date("2024-01-14"), make_date("2024-01-01"), 14);
        assert_eq!(period.start_date, make_date("2024-01-01"));
    }

    #[test]
    fn test_date_far_after_anchor() {
        let period = PayPeriod::containing(make_date("2026-01-15"), make_date("2024-01-01"), 14);
        assert!(period.contains_date(make_date("2026-01-15")));
        assert_eq!((period.end_date - period.start_date).num_days(), 13);
        assert_eq!((period.start_date - make_date("2024-01-01")).num_days() % 14, 0);
    }

    #[test]
    fn test_date_before_anchor() {
        let period = PayPeriod::containing(make_date("2023-12-31"), make_date("2024-01-01"), 14);
        assert_eq!(period.start_date, make_date("2023-12-18"));
        assert_eq!(period.end_date, make_date("2023-12-31"));
    }

    #[test]
    fn test_contains_date_is_inclusive() {
        let period = PayPeriod {
            start_date: make_date("2026-01-13"),
            end_date: make_date("2026-01-26"),
        };
        assert!(period.contains_date(make_date("2026-01-13")));
        assert!(period.contains_date(make_date("2026-01-26")));
        assert!(!period.contains_date(make_date("2026-01-27")));
    }
}
