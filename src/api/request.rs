//! Request types for the settlement API.
//!
//! Every operation is scoped to a tenant, so each request carries
//! `tenant_id` explicitly.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::WageIncreaseRequest;

/// Request body for `POST /budget/deductions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetDeductionRequest {
    /// Shift to bill.
    pub shift_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// User recorded on the transaction.
    pub acting_user_id: String,
}

/// Request body for the smart timesheet endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmartTimesheetRequest {
    /// Shift being settled.
    pub shift_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// When completion was submitted, in provider local time; defaults to the local clock.
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
}

/// Request body for `POST /shifts/complete`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteShiftRequest {
    /// Shift marked completed.
    pub shift_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// User completing the shift.
    pub acting_user_id: String,
    /// When completion was submitted, in provider local time; defaults to the local clock.
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
}

/// Request body for `POST /payroll/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Worker being paid.
    pub user_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Gross pay for the period.
    pub gross_pay: Decimal,
    /// Gross pay earlier in the year.
    #[serde(default)]
    pub ytd_gross: Decimal,
    /// Also add the accrued leave to the worker's balances.
    #[serde(default)]
    pub accrue_leave: bool,
}

/// Request body for `POST /wage-increase/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageIncreaseValidationRequest {
    /// Increase in percent.
    pub increase_percentage: Decimal,
    /// Proposed effective date.
    pub effective_date: NaiveDate,
}

/// Request body for `POST /wage-increase/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WageIncreasePreviewRequest {
    /// Increase in percent.
    pub increase_percentage: Decimal,
}

/// Request body for `POST /wage-increase/apply`.
pub type WageIncreaseApplyRequest = WageIncreaseRequest;
