//! Settlement operations.
//!
//! Each service reads through a [`SettlementStore`](crate::store::SettlementStore),
//! runs the pure policy functions in [`crate::calculation`] and writes the
//! results back. Data-incomplete and policy failures come back as `Skipped`
//! outcomes; only store failures and batch validation failures are returned
//! as `Err`.

mod budget_ledger;
mod completion;
mod hourly_rate;
mod payroll;
mod timesheet_settlement;
mod wage_scale;

pub use budget_ledger::{DeductionOutcome, process_budget_deduction, resolve_billable_rate};
pub use completion::{CompletionReport, settle_completed_shift};
pub use hourly_rate::get_user_hourly_rate;
pub use payroll::{PayrollCalculation, apply_leave_accrual, calculate_payroll, load_tax_brackets};
pub use timesheet_settlement::{
    SmartTimesheetCalculation, TimesheetOutcome, calculate_smart_timesheet_hours,
    create_smart_timesheet_entry,
};
pub use wage_scale::{
    RatePreview, TenantUpdateResult, WageIncreaseOutcome, WageIncreasePreview,
    WageIncreaseRequest, WageIncreaseValidation, apply_yearly_wage_increase,
    preview_wage_increase, validate_wage_increase,
};
