//! HTTP API module for the settlement engine.
//!
//! This module exposes budget deduction, smart timesheet settlement,
//! payroll and wage-increase operations as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    BudgetDeductionRequest, CompleteShiftRequest, PayrollRequest, SmartTimesheetRequest,
    WageIncreaseApplyRequest, WageIncreasePreviewRequest, WageIncreaseValidationRequest,
};
pub use response::{ApiError, ApiErrorResponse, PayrollResponse};
pub use state::AppState;
