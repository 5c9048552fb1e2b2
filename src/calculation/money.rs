//! Rounding helpers shared by every calculation.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to cents, halves away from zero.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::round_to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let withheld = Decimal::from(6717) / Decimal::from(26);
/// assert_eq!(round_to_cents(withheld), Decimal::from_str("258.35").unwrap());
/// assert_eq!(round_to_cents(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.13").unwrap());
/// ```
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds paid hours to two decimal places.
pub fn round_hours(hours: Decimal) -> Decimal {
    hours.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts whole minutes to hours.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}
