//! Billable rate resolution.
//!
//! Precedence, in order:
//! 1. the client's price override for the shift type
//! 2. the tenant pricing table row for (shift type, ratio)
//!
//! A source only counts if it yields a positive rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::ShiftType;

/// Where a resolved rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Client-specific override on the budget.
    PriceOverride,
    /// Tenant-wide NDIS pricing table.
    PricingTable,
}

/// A billable hourly rate and its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRate {
    /// Hourly rate.
    pub rate: Decimal,
    /// Which source supplied it.
    pub source: RateSource,
}

/// Picks the billable rate from the candidate sources.
///
/// # Errors
///
/// `RateNotFound` when neither source offers a positive rate.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::{select_rate, RateSource};
/// use settlement_engine::models::ShiftType;
/// use rust_decimal::Decimal;
///
/// let resolved = select_rate(
///     ShiftType::AM,
///     "1:1",
///     "tenant_a",
///     Some(Decimal::from(45)),
///     Some(Decimal::from(40)),
/// )
/// .unwrap();
/// assert_eq!(resolved.rate, Decimal::from(45));
/// assert_eq!(resolved.source, RateSource::PriceOverride);
/// ```
pub fn select_rate(
    shift_type: ShiftType,
    ratio: &str,
    tenant_id: &str,
    price_override: Option<Decimal>,
    table_rate: Option<Decimal>,
) -> EngineResult<ResolvedRate> {
    let positive = |rate: Option<Decimal>| rate.filter(|r| *r > Decimal::ZERO);

    if let Some(rate) = positive(price_override) {
        return Ok(ResolvedRate {
            rate,
            source: RateSource::PriceOverride,
        });
    }

    if let Some(rate) = positive(table_rate) {
        return Ok(ResolvedRate {
            rate,
            source: RateSource::PricingTable,
        });
    }

    Err(EngineError::RateNotFound {
        shift_type,
        ratio: ratio.to_string(),
        tenant_id: tenant_id.to_string(),
    })
}
