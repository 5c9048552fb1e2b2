//! Persistence seam for the settlement engine.
//!
//! The engine never talks to a database directly. It reads and writes
//! through [`SettlementStore`], which the host application implements over
//! its relational store. [`MemoryStore`] is a complete thread-safe
//! implementation used by the binary, the tests and the benchmarks;
//! [`SeedData`] fills it from a YAML file at startup.
//!
//! Two operations carry the engine's concurrency contract and must be
//! atomic in any implementation:
//!
//! - [`SettlementStore::commit_budget_deduction`] checks for an existing
//!   transaction for the shift, then runs a conditional update
//!   (`remaining = remaining - cost WHERE remaining >= cost`) plus the
//!   transaction insert, never a read-then-write pair.
//! - [`SettlementStore::apply_pay_scale_increase`] reads and rewrites all of
//!   a tenant's rows in one transaction.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::{SeedBudget, SeedData};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::EngineResult;
use crate::models::{
    ActivityLogEntry, BudgetTransaction, LeaveBalance, LeaveType, NdisBudget, NdisPricing,
    Notification, PayPeriod, PayScale, PayScaleKey, Shift, ShiftType, StaffMember, TaxBracket,
    Tenant, Timesheet, TimesheetEntry,
};

/// Outcome of an atomic conditional deduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeductionCommit {
    /// Balance covered the cost; transaction recorded.
    Applied {
        /// Balance after the deduction.
        remaining: Decimal,
    },
    /// The shift was billed before; nothing written.
    AlreadyApplied {
        /// The transaction recorded for the shift.
        transaction: BudgetTransaction,
        /// Current balance of that transaction's category.
        remaining: Decimal,
    },
    /// Balance did not cover the cost; nothing written.
    Insufficient {
        /// Balance at the time of the check.
        remaining: Decimal,
    },
    /// The budget no longer exists.
    BudgetMissing,
}

/// Storage operations the engine depends on.
pub trait SettlementStore: Send + Sync {
    /// Loads a shift within a tenant.
    fn get_shift(&self, shift_id: &str, tenant_id: &str) -> EngineResult<Option<Shift>>;

    /// Lists every tenant.
    fn list_tenants(&self) -> EngineResult<Vec<Tenant>>;

    /// Loads a client's budget.
    fn get_ndis_budget_by_client(
        &self,
        client_id: &str,
        tenant_id: &str,
    ) -> EngineResult<Option<NdisBudget>>;

    /// Loads the pricing table row for a shift type and ratio.
    fn get_ndis_pricing(
        &self,
        shift_type: ShiftType,
        ratio: &str,
        tenant_id: &str,
    ) -> EngineResult<Option<NdisPricing>>;

    /// Atomically deducts `transaction.amount` from the transaction's budget
    /// category if it is covered, and records the transaction.
    ///
    /// A shift is billed at most once: if a transaction already exists for
    /// `transaction.shift_id` in the tenant, it is returned as
    /// [`DeductionCommit::AlreadyApplied`] and the balance is left alone.
    fn commit_budget_deduction(
        &self,
        transaction: &BudgetTransaction,
    ) -> EngineResult<DeductionCommit>;

    /// Lists a budget's transactions in insertion order.
    fn list_budget_transactions(&self, budget_id: &str) -> EngineResult<Vec<BudgetTransaction>>;

    /// Appends an audit record.
    fn create_activity_log(&self, entry: ActivityLogEntry) -> EngineResult<()>;

    /// Queues a notification for delivery.
    fn create_notification(&self, notification: Notification) -> EngineResult<()>;

    /// Loads a worker's payroll profile.
    fn get_staff_member(&self, user_id: &str, tenant_id: &str)
    -> EngineResult<Option<StaffMember>>;

    /// Loads one pay scale row.
    fn get_pay_scale(&self, tenant_id: &str, key: PayScaleKey) -> EngineResult<Option<PayScale>>;

    /// Lists a tenant's pay scale rows.
    fn list_pay_scales(&self, tenant_id: &str) -> EngineResult<Vec<PayScale>>;

    /// Raises every pay scale row of a tenant by `increase_percentage` in one
    /// transaction.
    ///
    /// Each new rate is computed from the rate stored at commit time, so an
    /// edit made after a preview is never overwritten with a stale value.
    /// Returns the number of rows updated.
    fn apply_pay_scale_increase(
        &self,
        tenant_id: &str,
        increase_percentage: Decimal,
        effective_date: NaiveDate,
    ) -> EngineResult<usize>;

    /// Loads the brackets for a tax year.
    fn get_tax_brackets(&self, tax_year: i32) -> EngineResult<Vec<TaxBracket>>;

    /// Stores a tax bracket.
    fn create_tax_bracket(&self, bracket: TaxBracket) -> EngineResult<()>;

    /// Returns the worker's timesheet for the period, creating a draft if needed.
    fn find_or_create_timesheet(
        &self,
        user_id: &str,
        tenant_id: &str,
        period: PayPeriod,
    ) -> EngineResult<Timesheet>;

    /// Loads a timesheet.
    fn get_timesheet(&self, timesheet_id: &str) -> EngineResult<Option<Timesheet>>;

    /// Loads the entry settled for a shift, if any.
    fn get_timesheet_entry_by_shift(&self, shift_id: &str)
    -> EngineResult<Option<TimesheetEntry>>;

    /// Inserts the entry, or replaces the one already recorded for its shift.
    ///
    /// A replaced entry keeps its id and timesheet. Fails with
    /// `TimesheetLocked` if the owning timesheet is approved or paid.
    fn upsert_timesheet_entry(&self, entry: TimesheetEntry) -> EngineResult<TimesheetEntry>;

    /// Re-derives a timesheet's totals from its entries.
    fn recalculate_timesheet_totals(&self, timesheet_id: &str) -> EngineResult<Timesheet>;

    /// Adds hours to a leave balance, creating it if needed.
    fn accrue_leave(
        &self,
        user_id: &str,
        tenant_id: &str,
        leave_type: LeaveType,
        hours: Decimal,
    ) -> EngineResult<LeaveBalance>;

    /// Loads a leave balance.
    fn get_leave_balance(
        &self,
        user_id: &str,
        tenant_id: &str,
        leave_type: LeaveType,
    ) -> EngineResult<Option<LeaveBalance>>;
}
