//! Core data models for the settlement engine.
//!
//! This module contains all the domain models used throughout the engine.

mod activity;
mod budget;
mod employee;
mod leave;
mod pay_period;
mod shift;
mod tax;
mod timesheet;

pub use activity::{ActivityLogEntry, Notification, NotificationKind, Tenant};
pub use budget::{
    BudgetTransaction, CategoryBalance, FundingCategory, InsufficientFundsNotice, NdisBudget,
    NdisPricing,
};
pub use employee::{EmploymentType, PayScale, PayScaleKey, StaffMember};
pub use leave::{LeaveAccrual, LeaveBalance, LeaveType};
pub use pay_period::PayPeriod;
pub use shift::{Shift, ShiftStatus, ShiftType};
pub use tax::TaxBracket;
pub use timesheet::{PaymentMethod, Timesheet, TimesheetEntry, TimesheetStatus, timesheet_totals};
