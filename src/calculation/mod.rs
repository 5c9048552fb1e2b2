//! Calculation logic for the settlement engine.
//!
//! Every function here is pure: shift type classification, billable rate
//! selection, funding category fallback, unpaid break tiers, budget
//! deduction planning, smart timesheet hours, marginal tax and leave
//! accrual, and wage increase arithmetic and validation. Store access lives
//! in [`crate::services`].

mod break_policy;
mod budget_deduction;
mod funding_category;
mod money;
mod payroll_tax;
mod rate_resolution;
mod shift_classification;
mod smart_timesheet;
mod wage_increase;

pub use break_policy::unpaid_break_minutes;
pub use budget_deduction::{DeductionPlan, plan_budget_deduction, shift_type_of};
pub use funding_category::{default_funding_category, resolve_funding_category};
pub use money::{minutes_to_hours, round_hours, round_to_cents};
pub use payroll_tax::{
    PayrollBreakdown, PayrollInputs, annualize_income, calculate_leave_accrual,
    calculate_payroll_breakdown, marginal_tax, tax_year_for,
};
pub use rate_resolution::{RateSource, ResolvedRate, select_rate};
pub use shift_classification::{
    DAY_SHIFT_START_HOUR, EVENING_SHIFT_START_HOUR, classify_shift_type, resolve_shift_type,
};
pub use smart_timesheet::{SmartHours, calculate_smart_hours, gross_pay};
pub use wage_increase::{
    increased_rate, next_annual_increase_date, validate_wage_increase, wage_increase_warnings,
};
