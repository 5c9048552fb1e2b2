//! Funding category selection for billing.

use crate::models::{FundingCategory, ShiftType};

/// Category a shift type bills to when the shift names none.
pub fn default_funding_category(shift_type: ShiftType) -> FundingCategory {
    match shift_type {
        ShiftType::AM | ShiftType::PM => FundingCategory::CommunityAccess,
        ShiftType::ActiveNight | ShiftType::Sleepover => FundingCategory::SIL,
    }
}

/// Returns the explicit category if the shift has one, else the default
/// for its shift type.
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::resolve_funding_category;
/// use settlement_engine::models::{FundingCategory, ShiftType};
///
/// assert_eq!(
///     resolve_funding_category(Some(FundingCategory::CapacityBuilding), ShiftType::AM),
///     FundingCategory::CapacityBuilding
/// );
/// assert_eq!(resolve_funding_category(None, ShiftType::ActiveNight), FundingCategory::SIL);
/// ```
pub fn resolve_funding_category(
    explicit: Option<FundingCategory>,
    shift_type: ShiftType,
) -> FundingCategory {
    explicit.unwrap_or_else(|| default_funding_category(shift_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_by_shift_type() {
        assert_eq!(
            default_funding_category(ShiftType::AM),
            FundingCategory::CommunityAccess
        );
        assert_eq!(
            default_funding_category(ShiftType::PM),
            FundingCategory::CommunityAccess
        );
        assert_eq!(
            default_funding_category(ShiftType::ActiveNight),
            FundingCategory::SIL
        );
        assert_eq!(
            default_funding_category(ShiftType::Sleepover),
            FundingCategory::SIL
        );
    }

    #[test]
    fn test_explicit_category_is_never_overridden() {
        for shift_type in [
            ShiftType::AM,
            ShiftType::PM,
            ShiftType::ActiveNight,
            ShiftType::Sleepover,
        ] {
            assert_eq!(
                resolve_funding_category(Some(FundingCategory::SIL), shift_type),
                FundingCategory::SIL
            );
        }
    }
}
