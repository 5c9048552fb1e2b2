//! Settlement of a shift marked completed.
//!
//! Billing and pay are independent: either may fail without stopping the
//! other, and neither failure is returned to the caller. Whatever happened
//! is captured in the [`CompletionReport`].

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::store::SettlementStore;

use super::budget_ledger::{DeductionOutcome, process_budget_deduction};
use super::timesheet_settlement::{TimesheetOutcome, create_smart_timesheet_entry};

/// What settling a completed shift did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    /// Shift settled.
    pub shift_id: String,
    /// Budget deduction result, if the step ran to completion.
    pub billing: Option<DeductionOutcome>,
    /// Why billing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_error: Option<String>,
    /// Timesheet result, if the step ran to completion.
    pub pay: Option<TimesheetOutcome>,
    /// Why pay settlement failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_error: Option<String>,
}

/// Runs budget deduction and timesheet settlement for a completed shift.
pub fn settle_completed_shift(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    shift_id: &str,
    tenant_id: &str,
    acting_user_id: &str,
    submitted_at: NaiveDateTime,
) -> CompletionReport {
    let mut report = CompletionReport {
        shift_id: shift_id.to_string(),
        billing: None,
        billing_error: None,
        pay: None,
        pay_error: None,
    };

    let shift = match store.get_shift(shift_id, tenant_id) {
        Ok(Some(shift)) => Some(shift),
        Ok(None) => {
            report.billing_error = Some(
                EngineError::ShiftNotFound {
                    shift_id: shift_id.to_string(),
                    tenant_id: tenant_id.to_string(),
                }
                .to_string(),
            );
            None
        }
        Err(err) => {
            report.billing_error = Some(err.to_string());
            None
        }
    };

    if let Some(shift) = shift {
        match process_budget_deduction(store, &shift, acting_user_id) {
            Ok(outcome) => report.billing = Some(outcome),
            Err(err) => {
                error!(shift_id = %shift_id, error = %err, "Billing failed for completed shift");
                report.billing_error = Some(err.to_string());
            }
        }
    }

    match create_smart_timesheet_entry(store, config, shift_id, tenant_id, submitted_at) {
        Ok(outcome) => report.pay = Some(outcome),
        Err(err) => {
            error!(shift_id = %shift_id, error = %err, "Pay settlement failed for completed shift");
            report.pay_error = Some(err.to_string());
        }
    }

    info!(
        shift_id = %shift_id,
        billed = matches!(
            report.billing,
            Some(DeductionOutcome::Applied { .. } | DeductionOutcome::AlreadyApplied { .. })
        ),
        paid = matches!(report.pay, Some(TimesheetOutcome::Settled { .. })),
        "Completed shift settled"
    );
    report
}
