//! HTTP request handlers for the settlement API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineError;
use crate::services::{
    apply_leave_accrual, apply_yearly_wage_increase, calculate_payroll,
    calculate_smart_timesheet_hours, create_smart_timesheet_entry, preview_wage_increase,
    process_budget_deduction, settle_completed_shift, validate_wage_increase,
};

use super::request::{
    BudgetDeductionRequest, CompleteShiftRequest, PayrollRequest, SmartTimesheetRequest,
    WageIncreaseApplyRequest, WageIncreasePreviewRequest, WageIncreaseValidationRequest,
};
use super::response::{ApiError, ApiErrorResponse, PayrollResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/budget/deductions", post(budget_deduction_handler))
        .route("/timesheets/smart/calculate", post(smart_calculate_handler))
        .route("/timesheets/smart", post(smart_entry_handler))
        .route("/shifts/complete", post(complete_shift_handler))
        .route("/payroll/calculate", post(payroll_handler))
        .route("/wage-increase/validate", post(wage_validate_handler))
        .route("/wage-increase/preview", post(wage_preview_handler))
        .route("/wage-increase/apply", post(wage_apply_handler))
        .with_state(state)
}

/// Unwraps a JSON body or builds the 400 response for it.
fn parse_payload<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(request)) => return Ok(request),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(json_response(StatusCode::BAD_REQUEST, &error))
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, &api_error.error)
}

/// Submission time, defaulting to the provider's local clock.
fn submitted_at(state: &AppState, requested: Option<NaiveDateTime>) -> NaiveDateTime {
    requested.unwrap_or_else(|| state.config().timesheet.local_now())
}

/// Handler for POST /budget/deductions.
async fn budget_deduction_handler(
    State(state): State<AppState>,
    payload: Result<Json<BudgetDeductionRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        shift_id = %request.shift_id,
        "Processing budget deduction"
    );

    let store = state.store();
    let shift = match store.get_shift(&request.shift_id, &request.tenant_id) {
        Ok(Some(shift)) => shift,
        Ok(None) => {
            return error_response(
                correlation_id,
                EngineError::ShiftNotFound {
                    shift_id: request.shift_id,
                    tenant_id: request.tenant_id,
                },
            );
        }
        Err(err) => return error_response(correlation_id, err),
    };

    match process_budget_deduction(store, &shift, &request.acting_user_id) {
        Ok(outcome) => json_response(StatusCode::OK, &outcome),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /timesheets/smart/calculate.
///
/// Computes hours and pay without writing anything.
async fn smart_calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SmartTimesheetRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match calculate_smart_timesheet_hours(
        state.store(),
        state.config(),
        &request.shift_id,
        &request.tenant_id,
        submitted_at(&state, request.submitted_at),
    ) {
        Ok(calculation) => json_response(StatusCode::OK, &calculation),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /timesheets/smart.
async fn smart_entry_handler(
    State(state): State<AppState>,
    payload: Result<Json<SmartTimesheetRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        shift_id = %request.shift_id,
        "Settling timesheet entry"
    );

    match create_smart_timesheet_entry(
        state.store(),
        state.config(),
        &request.shift_id,
        &request.tenant_id,
        submitted_at(&state, request.submitted_at),
    ) {
        Ok(outcome) => json_response(StatusCode::OK, &outcome),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /shifts/complete.
///
/// Always answers 200; failures are reported inside the body.
async fn complete_shift_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompleteShiftRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let start_time = Instant::now();
    let report = settle_completed_shift(
        state.store(),
        state.config(),
        &request.shift_id,
        &request.tenant_id,
        &request.acting_user_id,
        submitted_at(&state, request.submitted_at),
    );
    info!(
        correlation_id = %correlation_id,
        shift_id = %request.shift_id,
        duration_us = start_time.elapsed().as_micros(),
        "Completed shift processed"
    );
    json_response(StatusCode::OK, &report)
}

/// Handler for POST /payroll/calculate.
async fn payroll_handler(
    State(state): State<AppState>,
    payload: Result<Json<PayrollRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let store = state.store();
    let calculation = match calculate_payroll(
        store,
        state.config(),
        &request.user_id,
        &request.tenant_id,
        request.gross_pay,
        request.ytd_gross,
        state.config().timesheet.local_now().date(),
    ) {
        Ok(calculation) => calculation,
        Err(err) => return error_response(correlation_id, err),
    };

    let leave_balances = if request.accrue_leave {
        match apply_leave_accrual(
            store,
            &request.user_id,
            &request.tenant_id,
            &calculation.breakdown.leave_accrued,
        ) {
            Ok(balances) => balances,
            Err(err) => return error_response(correlation_id, err),
        }
    } else {
        Vec::new()
    };

    json_response(
        StatusCode::OK,
        &PayrollResponse {
            calculation,
            leave_balances,
        },
    )
}

/// Handler for POST /wage-increase/validate.
async fn wage_validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<WageIncreaseValidationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let validation = validate_wage_increase(
        state.config(),
        request.increase_percentage,
        request.effective_date,
        state.config().timesheet.local_now().date(),
    );
    json_response(StatusCode::OK, &validation)
}

/// Handler for POST /wage-increase/preview.
async fn wage_preview_handler(
    State(state): State<AppState>,
    payload: Result<Json<WageIncreasePreviewRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    match preview_wage_increase(state.store(), state.config(), request.increase_percentage) {
        Ok(preview) => json_response(StatusCode::OK, &preview),
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /wage-increase/apply.
async fn wage_apply_handler(
    State(state): State<AppState>,
    payload: Result<Json<WageIncreaseApplyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_payload(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    info!(
        correlation_id = %correlation_id,
        percentage = %request.increase_percentage,
        applied_by = %request.applied_by,
        "Applying wage increase"
    );

    match apply_yearly_wage_increase(
        state.store(),
        state.config(),
        &request,
        state.config().timesheet.local_now().date(),
    ) {
        Ok(outcome) => json_response(StatusCode::OK, &outcome),
        Err(err) => error_response(correlation_id, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{Shift, ShiftStatus};
    use crate::store::MemoryStore;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn at(s: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok()
    }

    fn create_test_state() -> AppState {
        let store = MemoryStore::new();
        store.insert_shift(Shift {
            id: "shift_001".to_string(),
            tenant_id: "tenant_a".to_string(),
            client_id: Some("client_001".to_string()),
            user_id: Some("user_001".to_string()),
            start_time: at("2026-01-15 09:00:00"),
            end_time: at("2026-01-15 17:00:00"),
            status: ShiftStatus::Completed,
            staff_ratio: "1:1".to_string(),
            funding_category: None,
            shift_type: None,
        });
        AppState::new(Arc::new(store), EngineConfig::default())
    }

    async fn post(router: Router, uri: &str, body: String) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let (status, body) = post(router, "/timesheets/smart", "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());
        let body = json!({ "tenant_id": "tenant_a" }).to_string();
        let (status, body) = post(router, "/timesheets/smart", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("missing field"));
    }

    #[tokio::test]
    async fn test_unknown_shift_returns_404() {
        let router = create_router(create_test_state());
        let body = json!({
            "shift_id": "shift_404",
            "tenant_id": "tenant_a",
            "acting_user_id": "admin"
        })
        .to_string();
        let (status, body) = post(router, "/budget/deductions", body).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "SHIFT_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_budget_deduction_without_budget_is_skipped() {
        let router = create_router(create_test_state());
        let body = json!({
            "shift_id": "shift_001",
            "tenant_id": "tenant_a",
            "acting_user_id": "admin"
        })
        .to_string();
        let (status, body) = post(router, "/budget/deductions", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "skipped");
    }

    #[tokio::test]
    async fn test_smart_calculate_early_submission() {
        let router = create_router(create_test_state());
        let body = json!({
            "shift_id": "shift_001",
            "tenant_id": "tenant_a",
            "submitted_at": "2026-01-15T16:00:00"
        })
        .to_string();
        let (status, body) = post(router, "/timesheets/smart/calculate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment_method"], "actual");
        assert_eq!(body["break_minutes"], 45);
        assert_eq!(body["raw_minutes"], 420);
    }

    #[tokio::test]
    async fn test_default_submission_uses_local_clock() {
        let config = EngineConfig::default();
        let local_now = config.timesheet.local_now();
        let store = MemoryStore::new();
        store.insert_shift(Shift {
            id: "shift_now".to_string(),
            tenant_id: "tenant_a".to_string(),
            client_id: None,
            user_id: Some("user_001".to_string()),
            start_time: Some(local_now - chrono::Duration::hours(3)),
            end_time: Some(local_now + chrono::Duration::hours(3)),
            status: ShiftStatus::InProgress,
            staff_ratio: "1:1".to_string(),
            funding_category: None,
            shift_type: None,
        });
        let router = create_router(AppState::new(Arc::new(store), config));
        let body = json!({ "shift_id": "shift_now", "tenant_id": "tenant_a" }).to_string();
        let (status, body) = post(router, "/timesheets/smart/calculate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["payment_method"], "actual");
        let raw = body["raw_minutes"].as_i64().unwrap();
        assert!((180..=181).contains(&raw), "raw_minutes was {}", raw);
    }

    #[tokio::test]
    async fn test_wage_validate_rejects_zero_percent() {
        let router = create_router(create_test_state());
        let body = json!({
            "increase_percentage": "0",
            "effective_date": "2099-07-01"
        })
        .to_string();
        let (status, body) = post(router, "/wage-increase/validate", body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    }
}
