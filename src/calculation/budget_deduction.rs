//! Budget deduction planning.
//!
//! Works out what a shift costs and which category pays for it, without
//! touching any balance. Billing always uses the *scheduled* duration: a
//! booked session is charged in full however early or late it finishes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{FundingCategory, Shift, ShiftType};

use super::funding_category::resolve_funding_category;
use super::money::{minutes_to_hours, round_to_cents};
use super::shift_classification::resolve_shift_type;

/// The cost of a shift and where it will be charged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionPlan {
    /// Shift type used for pricing.
    pub shift_type: ShiftType,
    /// Category to charge.
    pub category: FundingCategory,
    /// Scheduled hours.
    pub hours: Decimal,
    /// Hourly rate.
    pub rate: Decimal,
    /// hours × rate rounded to cents.
    pub cost: Decimal,
}

/// Shift type of a shift with a scheduled start.
///
/// # Errors
///
/// `IncompleteShift` when the scheduled start is missing.
pub fn shift_type_of(shift: &Shift) -> EngineResult<ShiftType> {
    let start = shift.start_time.ok_or_else(|| EngineError::IncompleteShift {
        shift_id: shift.id.clone(),
        message: "missing scheduled start time".to_string(),
    })?;
    Ok(resolve_shift_type(shift.shift_type, start))
}

/// Plans the deduction for a shift at the given rate.
///
/// # Errors
///
/// - `IncompleteShift` if either scheduled time is missing
/// - `InvalidShift` if the scheduled duration is not positive
///
/// # Examples
///
/// ```
/// use settlement_engine::calculation::plan_budget_deduction;
/// use settlement_engine::models::{FundingCategory, Shift, ShiftStatus};
/// use chrono::NaiveDateTime;
/// use rust_decimal::Decimal;
///
/// let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok();
/// let shift = Shift {
///     id: "shift_001".to_string(),
///     tenant_id: "tenant_a".to_string(),
///     client_id: Some("client_001".to_string()),
///     user_id: None,
///     start_time: at("2026-01-15 09:00:00"),
///     end_time: at("2026-01-15 17:00:00"),
///     status: ShiftStatus::Completed,
///     staff_ratio: "1:1".to_string(),
///     funding_category: None,
///     shift_type: None,
/// };
///
/// let plan = plan_budget_deduction(&shift, Decimal::from(40)).unwrap();
/// assert_eq!(plan.cost, Decimal::new(32000, 2));
/// assert_eq!(plan.category, FundingCategory::CommunityAccess);
/// ```
pub fn plan_budget_deduction(shift: &Shift, rate: Decimal) -> EngineResult<DeductionPlan> {
    let (start, end) = shift
        .scheduled_window()
        .ok_or_else(|| EngineError::IncompleteShift {
            shift_id: shift.id.clone(),
            message: "missing scheduled start or end time".to_string(),
        })?;

    let minutes = (end - start).num_minutes();
    if minutes <= 0 {
        return Err(EngineError::InvalidShift {
            shift_id: shift.id.clone(),
            message: format!("scheduled duration is {} minutes", minutes),
        });
    }

    let shift_type = resolve_shift_type(shift.shift_type, start);
    let category = resolve_funding_category(shift.funding_category, shift_type);
    let hours = minutes_to_hours(minutes);
    let cost = round_to_cents(rate * hours);

    Ok(DeductionPlan {
        shift_type,
        category,
        hours,
        rate,
        cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShiftStatus;
    use chrono::NaiveDateTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn at(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
    }

    fn create_shift(start: &str, end: &str) -> Shift {
        Shift {
            id: "shift_001".to_string(),
            tenant_id: "tenant_a".to_string(),
            client_id: Some("client_001".to_string()),
            user_id: Some("user_001".to_string()),
            start_time: at(start),
            end_time: at(end),
            status: ShiftStatus::Completed,
            staff_ratio: "1:1".to_string(),
            funding_category: None,
            shift_type: None,
        }
    }

    #[test]
    fn test_scenario_a_day_shift_cost() {
        let shift = create_shift("2026-01-15 09:00:00", "2026-01-15 17:00:00");
        let plan = plan_budget_deduction(&shift, dec("40")).unwrap();
        assert_eq!(plan.shift_type, ShiftType::AM);
        assert_eq!(plan.category, FundingCategory::CommunityAccess);
        assert_eq!(plan.hours, dec("8"));
        assert_eq!(plan.cost, dec("320.00"));
    }

    #[test]
    fn test_cost_rounded_to_cents() {
        // 100 minutes at $33.33 = 55.55
        let shift = create_shift("2026-01-15 09:00:00", "2026-01-15 10:40:00");
        let plan = plan_budget_deduction(&shift, dec("33.33")).unwrap();
        assert_eq!(plan.cost, dec("55.55"));
    }

    #[test]
    fn test_overnight_shift_defaults_to_sil() {
        let shift = create_shift("2026-01-15 02:00:00", "2026-01-15 06:00:00");
        let plan = plan_budget_deduction(&shift, dec("50")).unwrap();
        assert_eq!(plan.shift_type, ShiftType::ActiveNight);
        assert_eq!(plan.category, FundingCategory::SIL);
        assert_eq!(plan.cost, dec("200.00"));
    }

    #[test]
    fn test_explicit_category_used() {
        let mut shift = create_shift("2026-01-15 09:00:00", "2026-01-15 11:00:00");
        shift.funding_category = Some(FundingCategory::CapacityBuilding);
        let plan = plan_budget_deduction(&shift, dec("40")).unwrap();
        assert_eq!(plan.category, FundingCategory::CapacityBuilding);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let shift = create_shift("2026-01-15 09:00:00", "2026-01-15 09:00:00");
        assert!(matches!(
            plan_budget_deduction(&shift, dec("40")),
            Err(EngineError::InvalidShift { .. })
        ));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let shift = create_shift("2026-01-15 17:00:00", "2026-01-15 09:00:00");
        assert!(matches!(
            plan_budget_deduction(&shift, dec("40")),
            Err(EngineError::InvalidShift { .. })
        ));
    }

    #[test]
    fn test_missing_times_is_incomplete() {
        let mut shift = create_shift("2026-01-15 09:00:00", "2026-01-15 17:00:00");
        shift.end_time = None;
        assert!(matches!(
            plan_budget_deduction(&shift, dec("40")),
            Err(EngineError::IncompleteShift { .. })
        ));
        shift.start_time = None;
        assert!(matches!(
            shift_type_of(&shift),
            Err(EngineError::IncompleteShift { .. })
        ));
    }
}
