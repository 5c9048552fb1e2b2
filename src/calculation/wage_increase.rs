//! Wage increase arithmetic and validation.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::config::WageIncreaseConfig;

use super::money::round_to_cents;

/// Applies a percentage increase to a rate, rounded to cents.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::increased_rate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let new_rate = increased_rate(Decimal::from_str("35.50").unwrap(), Decimal::from_str("3.75").unwrap());
/// assert_eq!(new_rate, Decimal::from_str("36.83").unwrap());
/// ```
pub fn increased_rate(old_rate: Decimal, percentage: Decimal) -> Decimal {
    round_to_cents(old_rate * (Decimal::ONE + percentage / Decimal::ONE_HUNDRED))
}

/// The first scheduled annual increase date on or after `today`.
pub fn next_annual_increase_date(today: NaiveDate, config: &WageIncreaseConfig) -> NaiveDate {
    let in_year = |year: i32| {
        NaiveDate::from_ymd_opt(year, config.annual_increase_month, config.annual_increase_day)
    };
    match in_year(today.year()) {
        Some(date) if date >= today => date,
        _ => in_year(today.year() + 1).unwrap_or(today),
    }
}

/// Errors that block a wage increase. Empty means valid.
pub fn validate_wage_increase(
    percentage: Decimal,
    effective_date: NaiveDate,
    today: NaiveDate,
    config: &WageIncreaseConfig,
) -> Vec<String> {
    let mut errors = Vec::new();

    if percentage <= Decimal::ZERO {
        errors.push(format!(
            "Increase percentage must be greater than 0 (got {})",
            percentage.normalize()
        ));
    } else if percentage > config.max_percentage {
        errors.push(format!(
            "Increase percentage must not exceed {}% (got {})",
            config.max_percentage.normalize(),
            percentage.normalize()
        ));
    }

    if effective_date < today {
        errors.push(format!(
            "Effective date {} is in the past (today is {})",
            effective_date, today
        ));
    }

    errors
}

/// Non-blocking warnings about an otherwise valid increase.
pub fn wage_increase_warnings(
    effective_date: NaiveDate,
    today: NaiveDate,
    config: &WageIncreaseConfig,
) -> Vec<String> {
    let scheduled = next_annual_increase_date(today, config);
    let gap = (effective_date - scheduled).num_days().abs();

    if gap > config.warning_window_days {
        vec![format!(
            "Effective date {} is {} days from the next scheduled annual increase on {}",
            effective_date, gap, scheduled
        )]
    } else {
        Vec::new()
    }
}
