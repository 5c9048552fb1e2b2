//! Smart timesheet settlement.
//!
//! Turns a completed shift into a timesheet entry: paid hours come from
//! [`calculate_smart_hours`], the rate from the worker's pay scale, and the
//! entry lands in the draft timesheet for the pay period containing the
//! shift's scheduled start. Settling the same shift again replaces its entry
//! and the timesheet totals are re-derived from the entries every time.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{calculate_smart_hours, gross_pay};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, PaymentMethod, Timesheet, TimesheetEntry};
use crate::store::SettlementStore;

use super::hourly_rate::get_user_hourly_rate;

/// Paid hours and pay for one shift, before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartTimesheetCalculation {
    /// Shift being settled.
    pub shift_id: String,
    /// Worker assigned to the shift.
    pub user_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Booked start.
    pub scheduled_start: NaiveDateTime,
    /// Booked end.
    pub scheduled_end: NaiveDateTime,
    /// When completion was submitted.
    pub submitted_at: NaiveDateTime,
    /// End time used for payment.
    pub actual_end: NaiveDateTime,
    /// Minutes from scheduled start to `actual_end`.
    pub raw_minutes: i64,
    /// Unpaid break deducted.
    pub break_minutes: i64,
    /// Paid hours, rounded to 2 dp.
    pub total_hours: Decimal,
    /// Worker's hourly rate.
    pub hourly_rate: Decimal,
    /// Exact paid hours × `hourly_rate`, rounded to cents.
    pub gross_pay: Decimal,
    /// Which duration was paid.
    pub payment_method: PaymentMethod,
    /// Human-readable reasoning.
    pub explanation: String,
}

/// Result of settling a shift into a timesheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimesheetOutcome {
    /// The entry was written and the timesheet totals refreshed.
    Settled {
        /// The stored entry.
        entry: TimesheetEntry,
        /// The timesheet with refreshed totals.
        timesheet: Timesheet,
        /// How the entry was derived.
        calculation: SmartTimesheetCalculation,
    },
    /// The shift could not be settled and nothing was written.
    Skipped {
        /// Why the shift was skipped.
        reason: String,
    },
}

/// Computes paid hours and gross pay for a shift without writing anything.
///
/// Fails with `ShiftNotFound` or `IncompleteShift` when the shift is missing
/// or lacks a schedule or an assigned worker.
pub fn calculate_smart_timesheet_hours(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    shift_id: &str,
    tenant_id: &str,
    submitted_at: NaiveDateTime,
) -> EngineResult<SmartTimesheetCalculation> {
    let shift = store
        .get_shift(shift_id, tenant_id)?
        .ok_or_else(|| EngineError::ShiftNotFound {
            shift_id: shift_id.to_string(),
            tenant_id: tenant_id.to_string(),
        })?;

    let (scheduled_start, scheduled_end) =
        shift
            .scheduled_window()
            .ok_or_else(|| EngineError::IncompleteShift {
                shift_id: shift.id.clone(),
                message: "missing scheduled start or end time".to_string(),
            })?;

    let user_id = shift.user_id.clone().ok_or_else(|| EngineError::IncompleteShift {
        shift_id: shift.id.clone(),
        message: "no worker assigned".to_string(),
    })?;

    let hours = calculate_smart_hours(scheduled_start, scheduled_end, submitted_at);
    let hourly_rate = get_user_hourly_rate(store, &config.payroll, &user_id, tenant_id)?;
    let gross = gross_pay(hours.paid_minutes, hourly_rate);

    Ok(SmartTimesheetCalculation {
        shift_id: shift.id,
        user_id,
        tenant_id: tenant_id.to_string(),
        scheduled_start,
        scheduled_end,
        submitted_at,
        actual_end: hours.actual_end,
        raw_minutes: hours.raw_minutes,
        break_minutes: hours.break_minutes,
        total_hours: hours.total_hours,
        hourly_rate,
        gross_pay: gross,
        payment_method: hours.payment_method,
        explanation: hours.explanation,
    })
}

/// Settles a shift into its worker's timesheet.
///
/// Idempotent per shift: a second call replaces the first entry rather than
/// adding another. Returns `Err` only for store failures.
pub fn create_smart_timesheet_entry(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    shift_id: &str,
    tenant_id: &str,
    submitted_at: NaiveDateTime,
) -> EngineResult<TimesheetOutcome> {
    match settle(store, config, shift_id, tenant_id, submitted_at) {
        Err(error) if error.is_skippable() => {
            warn!(
                shift_id = %shift_id,
                tenant_id = %tenant_id,
                error = %error,
                "Timesheet settlement skipped"
            );
            Ok(TimesheetOutcome::Skipped {
                reason: error.to_string(),
            })
        }
        other => other,
    }
}

fn settle(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    shift_id: &str,
    tenant_id: &str,
    submitted_at: NaiveDateTime,
) -> EngineResult<TimesheetOutcome> {
    let calculation =
        calculate_smart_timesheet_hours(store, config, shift_id, tenant_id, submitted_at)?;

    let period = PayPeriod::containing(
        calculation.scheduled_start.date(),
        config.timesheet.pay_period_anchor,
        config.timesheet.pay_period_days,
    );
    let timesheet = store.find_or_create_timesheet(&calculation.user_id, tenant_id, period)?;

    let entry = store.upsert_timesheet_entry(TimesheetEntry {
        id: Uuid::new_v4().to_string(),
        timesheet_id: timesheet.id,
        shift_id: Some(calculation.shift_id.clone()),
        start_time: calculation.scheduled_start,
        end_time: calculation.actual_end,
        break_minutes: calculation.break_minutes,
        total_hours: calculation.total_hours,
        hourly_rate: calculation.hourly_rate,
        gross_pay: calculation.gross_pay,
        payment_method: calculation.payment_method,
        submission_timestamp: Some(submitted_at),
        scheduled_end_time: Some(calculation.scheduled_end),
        updated_at: Utc::now(),
    })?;

    let timesheet = store.recalculate_timesheet_totals(&entry.timesheet_id)?;

    info!(
        shift_id = %calculation.shift_id,
        user_id = %calculation.user_id,
        timesheet_id = %timesheet.id,
        hours = %calculation.total_hours,
        gross_pay = %calculation.gross_pay,
        payment_method = %calculation.payment_method,
        timesheet_total_hours = %timesheet.total_hours,
        "Timesheet entry settled"
    );

    Ok(TimesheetOutcome::Settled {
        entry,
        timesheet,
        calculation,
    })
}
