//! Error types for the settlement engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that can stop a settlement, payroll or wage-scale
//! operation. Insufficient funds is deliberately absent: a rejected
//! deduction is a normal result value, not an error.

use thiserror::Error;

use crate::models::ShiftType;

/// The main error type for the settlement engine.
///
/// # Example
///
/// ```
/// use settlement_engine::error::EngineError;
///
/// let error = EngineError::ShiftNotFound {
///     shift_id: "shift_001".to_string(),
///     tenant_id: "tenant_a".to_string(),
/// };
/// assert_eq!(error.to_string(), "Shift 'shift_001' not found for tenant 'tenant_a'");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The shift does not exist for the tenant.
    #[error("Shift '{shift_id}' not found for tenant '{tenant_id}'")]
    ShiftNotFound {
        /// The requested shift.
        shift_id: String,
        /// The tenant the shift was looked up in.
        tenant_id: String,
    },

    /// The shift is missing data required for settlement.
    #[error("Shift '{shift_id}' is incomplete: {message}")]
    IncompleteShift {
        /// The incomplete shift.
        shift_id: String,
        /// What is missing.
        message: String,
    },

    /// The shift contains inconsistent data.
    #[error("Invalid shift '{shift_id}': {message}")]
    InvalidShift {
        /// The ID of the invalid shift.
        shift_id: String,
        /// A description of what made the shift invalid.
        message: String,
    },

    /// No NDIS budget exists for the client.
    #[error("No NDIS budget found for client '{client_id}' in tenant '{tenant_id}'")]
    BudgetNotFound {
        /// The client without a budget.
        client_id: String,
        /// The tenant searched.
        tenant_id: String,
    },

    /// Neither a price override nor the pricing table yields a positive rate.
    #[error("No rate found for {shift_type} shift at ratio '{ratio}' in tenant '{tenant_id}'")]
    RateNotFound {
        /// The classified shift type.
        shift_type: ShiftType,
        /// The staff ratio, e.g. "1:1".
        ratio: String,
        /// The tenant whose pricing table was searched.
        tenant_id: String,
    },

    /// The timesheet holding the entry can no longer be changed.
    #[error("Timesheet '{timesheet_id}' is {status} and cannot be modified")]
    TimesheetLocked {
        /// The locked timesheet.
        timesheet_id: String,
        /// Its current status.
        status: String,
    },

    /// Required configuration data is missing and could not be seeded.
    #[error("Configuration missing: {message}")]
    ConfigurationMissing {
        /// What is missing.
        message: String,
    },

    /// A batch request failed validation before any writes occurred.
    #[error("Validation failed: {}", errors.join("; "))]
    ValidationFailed {
        /// Every validation error found.
        errors: Vec<String>,
    },

    /// The backing store failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Returns true for errors that mean "log and skip" rather than a hard failure.
    ///
    /// Missing data and unresolvable policy inputs must never abort the
    /// shift-completion workflow that triggered settlement.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            EngineError::ShiftNotFound { .. }
                | EngineError::IncompleteShift { .. }
                | EngineError::InvalidShift { .. }
                | EngineError::BudgetNotFound { .. }
                | EngineError::RateNotFound { .. }
                | EngineError::TimesheetLocked { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
