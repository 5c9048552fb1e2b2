//! Budget deduction for completed shifts.
//!
//! A deduction resolves the billable rate, plans the cost, then commits it
//! through the store's conditional update. An uncovered cost is a normal
//! [`DeductionOutcome::Rejected`] result: nothing is written to the budget
//! and the acting user is notified. A shift is billed at most once, so a
//! retry returns [`DeductionOutcome::AlreadyApplied`] without charging.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{ResolvedRate, plan_budget_deduction, select_rate, shift_type_of};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ActivityLogEntry, BudgetTransaction, InsufficientFundsNotice, NdisBudget, Notification,
    NotificationKind, Shift,
};
use crate::store::{DeductionCommit, SettlementStore};

/// Result of processing a shift against its client's budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeductionOutcome {
    /// The cost was deducted and the transaction recorded.
    Applied {
        /// The recorded transaction.
        transaction: BudgetTransaction,
        /// Category balance after the deduction.
        remaining: Decimal,
    },
    /// The shift was billed earlier; nothing was charged this time.
    AlreadyApplied {
        /// The transaction recorded when the shift was billed.
        transaction: BudgetTransaction,
        /// Current balance of the billed category.
        remaining: Decimal,
    },
    /// The category balance did not cover the cost.
    Rejected(InsufficientFundsNotice),
    /// The shift could not be billed and was left untouched.
    Skipped {
        /// Why the shift was skipped.
        reason: String,
    },
}

/// Resolves the billable rate for a shift against a budget.
///
/// A positive per-client price override wins; otherwise the tenant's
/// pricing table row for the shift type and staff ratio is used.
pub fn resolve_billable_rate(
    store: &dyn SettlementStore,
    shift: &Shift,
    budget: &NdisBudget,
) -> EngineResult<ResolvedRate> {
    let shift_type = shift_type_of(shift)?;
    let table_rate = store
        .get_ndis_pricing(shift_type, &shift.staff_ratio, &shift.tenant_id)?
        .map(|pricing| pricing.rate);

    select_rate(
        shift_type,
        &shift.staff_ratio,
        &shift.tenant_id,
        budget.price_override(shift_type),
        table_rate,
    )
}

/// Deducts a shift's cost from its client's NDIS budget.
///
/// Returns `Err` only for store failures. Missing data, a missing rate or
/// budget, and an invalid duration all produce [`DeductionOutcome::Skipped`].
pub fn process_budget_deduction(
    store: &dyn SettlementStore,
    shift: &Shift,
    acting_user_id: &str,
) -> EngineResult<DeductionOutcome> {
    match deduct(store, shift, acting_user_id) {
        Err(error) if error.is_skippable() => {
            warn!(
                shift_id = %shift.id,
                tenant_id = %shift.tenant_id,
                error = %error,
                "Budget deduction skipped"
            );
            Ok(DeductionOutcome::Skipped {
                reason: error.to_string(),
            })
        }
        other => other,
    }
}

fn deduct(
    store: &dyn SettlementStore,
    shift: &Shift,
    acting_user_id: &str,
) -> EngineResult<DeductionOutcome> {
    let client_id = shift
        .client_id
        .as_deref()
        .ok_or_else(|| EngineError::IncompleteShift {
            shift_id: shift.id.clone(),
            message: "no client assigned".to_string(),
        })?;

    let budget = store
        .get_ndis_budget_by_client(client_id, &shift.tenant_id)?
        .ok_or_else(|| EngineError::BudgetNotFound {
            client_id: client_id.to_string(),
            tenant_id: shift.tenant_id.clone(),
        })?;

    let resolved = resolve_billable_rate(store, shift, &budget)?;
    let plan = plan_budget_deduction(shift, resolved.rate)?;

    let transaction = BudgetTransaction {
        id: Uuid::new_v4().to_string(),
        budget_id: budget.id.clone(),
        category: plan.category,
        shift_type: plan.shift_type,
        ratio: shift.staff_ratio.clone(),
        hours: plan.hours,
        rate: plan.rate,
        amount: plan.cost,
        shift_id: shift.id.clone(),
        created_by_user_id: acting_user_id.to_string(),
        tenant_id: shift.tenant_id.clone(),
        created_at: Utc::now(),
    };

    match store.commit_budget_deduction(&transaction)? {
        DeductionCommit::Applied { remaining } => {
            info!(
                shift_id = %shift.id,
                budget_id = %budget.id,
                category = %plan.category,
                amount = %plan.cost,
                remaining = %remaining,
                rate_source = ?resolved.source,
                "Budget deduction applied"
            );
            record_deduction(store, &transaction, remaining);
            Ok(DeductionOutcome::Applied {
                transaction,
                remaining,
            })
        }
        DeductionCommit::AlreadyApplied {
            transaction,
            remaining,
        } => {
            info!(
                shift_id = %shift.id,
                budget_id = %transaction.budget_id,
                transaction_id = %transaction.id,
                amount = %transaction.amount,
                "Shift already billed; no charge"
            );
            Ok(DeductionOutcome::AlreadyApplied {
                transaction,
                remaining,
            })
        }
        DeductionCommit::Insufficient { remaining } => {
            warn!(
                shift_id = %shift.id,
                budget_id = %budget.id,
                category = %plan.category,
                required = %plan.cost,
                remaining = %remaining,
                "Insufficient funds for shift"
            );
            let notice = InsufficientFundsNotice {
                shift_id: shift.id.clone(),
                budget_id: budget.id.clone(),
                category: plan.category,
                required: plan.cost,
                remaining,
            };
            notify_insufficient_funds(store, &shift.tenant_id, acting_user_id, &notice);
            Ok(DeductionOutcome::Rejected(notice))
        }
        DeductionCommit::BudgetMissing => Err(EngineError::BudgetNotFound {
            client_id: client_id.to_string(),
            tenant_id: shift.tenant_id.clone(),
        }),
    }
}

fn record_deduction(
    store: &dyn SettlementStore,
    transaction: &BudgetTransaction,
    remaining: Decimal,
) {
    let entry = ActivityLogEntry {
        tenant_id: transaction.tenant_id.clone(),
        user_id: transaction.created_by_user_id.clone(),
        action: "budget_deduction".to_string(),
        entity_type: "ndis_budget".to_string(),
        entity_id: transaction.budget_id.clone(),
        description: format!(
            "Deducted ${} from {} for shift {}",
            transaction.amount, transaction.category, transaction.shift_id
        ),
        details: json!({
            "transaction_id": transaction.id,
            "shift_id": transaction.shift_id,
            "shift_type": transaction.shift_type,
            "ratio": transaction.ratio,
            "hours": transaction.hours,
            "rate": transaction.rate,
            "amount": transaction.amount,
            "remaining": remaining,
        }),
        created_at: Utc::now(),
    };

    if let Err(error) = store.create_activity_log(entry) {
        warn!(
            shift_id = %transaction.shift_id,
            transaction_id = %transaction.id,
            error = %error,
            "Failed to write budget deduction audit record"
        );
    }
}

fn notify_insufficient_funds(
    store: &dyn SettlementStore,
    tenant_id: &str,
    user_id: &str,
    notice: &InsufficientFundsNotice,
) {
    let notification = Notification {
        tenant_id: tenant_id.to_string(),
        user_id: user_id.to_string(),
        kind: NotificationKind::Warning,
        title: "Insufficient NDIS funds".to_string(),
        message: format!(
            "Shift {} needs ${} from {} but only ${} remains",
            notice.shift_id, notice.required, notice.category, notice.remaining
        ),
        created_at: Utc::now(),
    };

    if let Err(error) = store.create_notification(notification) {
        warn!(
            shift_id = %notice.shift_id,
            error = %error,
            "Failed to send insufficient funds notification"
        );
    }
}
