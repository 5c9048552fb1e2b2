//! Tax bracket model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a progressive income tax table.
///
/// Brackets for a tax year are non-overlapping and together cover [0, ∞).
/// `max_income` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Financial year identified by the calendar year it starts in.
    pub tax_year: i32,
    /// Lower bound of the band.
    pub min_income: Decimal,
    /// Upper bound of the band, if any.
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Marginal rate applied inside the band.
    pub rate: Decimal,
    /// Tax accumulated by all lower bands.
    pub base_tax: Decimal,
}
