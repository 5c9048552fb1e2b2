//! Response types for the settlement API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::LeaveBalance;
use crate::services::PayrollCalculation;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Individual validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            errors: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// Response body for `POST /payroll/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollResponse {
    /// The pay-run breakdown.
    #[serde(flatten)]
    pub calculation: PayrollCalculation,
    /// Balances after accrual, when accrual was requested.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leave_balances: Vec<LeaveBalance>,
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::ShiftNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("SHIFT_NOT_FOUND", message),
            ),
            EngineError::BudgetNotFound { .. } => Self::new(
                StatusCode::NOT_FOUND,
                ApiError::new("BUDGET_NOT_FOUND", message),
            ),
            EngineError::RateNotFound { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "RATE_NOT_FOUND",
                    message,
                    "Neither the client's price overrides nor the pricing table has a positive rate",
                ),
            ),
            EngineError::IncompleteShift { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INCOMPLETE_SHIFT", message),
            ),
            EngineError::InvalidShift { .. } => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INVALID_SHIFT", message),
            ),
            EngineError::TimesheetLocked { .. } => Self::new(
                StatusCode::CONFLICT,
                ApiError::new("TIMESHEET_LOCKED", message),
            ),
            EngineError::ValidationFailed { errors } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiError {
                    errors,
                    ..ApiError::validation_error(message)
                },
            ),
            EngineError::ConfigurationMissing { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("CONFIGURATION_MISSING", message),
            ),
            EngineError::Store { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("STORE_ERROR", "Storage failure", message),
            ),
        }
    }
}
