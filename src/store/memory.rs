//! In-memory implementation of [`SettlementStore`].
//!
//! All tables sit behind a single mutex, so every trait method is one
//! critical section. That gives the once-per-shift conditional deduction,
//! the per-tenant rate increase and the shift-keyed entry upsert their
//! atomicity.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::calculation::increased_rate;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    ActivityLogEntry, BudgetTransaction, LeaveBalance, LeaveType, NdisBudget, NdisPricing,
    Notification, PayPeriod, PayScale, PayScaleKey, Shift, ShiftType, StaffMember, TaxBracket,
    Tenant, Timesheet, TimesheetEntry, TimesheetStatus, timesheet_totals,
};

use super::{DeductionCommit, SettlementStore};

#[derive(Debug, Default)]
struct Tables {
    tenants: Vec<Tenant>,
    shifts: HashMap<String, Shift>,
    budgets: HashMap<String, NdisBudget>,
    pricing: Vec<NdisPricing>,
    transactions: Vec<BudgetTransaction>,
    activity_logs: Vec<ActivityLogEntry>,
    notifications: Vec<Notification>,
    staff: HashMap<(String, String), StaffMember>,
    pay_scales: HashMap<String, Vec<PayScale>>,
    tax_brackets: Vec<TaxBracket>,
    timesheets: HashMap<String, Timesheet>,
    entries: Vec<TimesheetEntry>,
    leave: HashMap<(String, String, LeaveType), LeaveBalance>,
}

/// Thread-safe in-memory store.
///
/// # Example
///
/// ```
/// use settlement_engine::models::Tenant;
/// use settlement_engine::store::{MemoryStore, SettlementStore};
///
/// let store = MemoryStore::new();
/// store.insert_tenant(Tenant { id: "tenant_a".to_string(), name: "Acme Care".to_string() });
/// assert_eq!(store.list_tenants().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|e| EngineError::Store {
            message: format!("store lock poisoned: {}", e),
        })
    }

    // Seeding helpers. These stand in for the host application's own CRUD
    // layer, which is outside the engine. They cannot fail, so a poisoned
    // lock is recovered rather than reported.

    fn seed(&self) -> MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Adds or replaces a tenant.
    pub fn insert_tenant(&self, tenant: Tenant) {
        let mut tables = self.seed();
        tables.tenants.retain(|t| t.id != tenant.id);
        tables.tenants.push(tenant);
    }

    /// Adds or replaces a shift.
    pub fn insert_shift(&self, shift: Shift) {
        self.seed().shifts.insert(shift.id.clone(), shift);
    }

    /// Adds or replaces a budget.
    pub fn insert_budget(&self, budget: NdisBudget) {
        self.seed().budgets.insert(budget.id.clone(), budget);
    }

    /// Adds a pricing table row, replacing any row with the same key.
    pub fn insert_pricing(&self, pricing: NdisPricing) {
        let mut tables = self.seed();
        tables.pricing.retain(|p| {
            !(p.tenant_id == pricing.tenant_id
                && p.shift_type == pricing.shift_type
                && p.ratio == pricing.ratio)
        });
        tables.pricing.push(pricing);
    }

    /// Adds or replaces a staff member.
    pub fn insert_staff_member(&self, staff: StaffMember) {
        self.seed()
            .staff
            .insert((staff.tenant_id.clone(), staff.id.clone()), staff);
    }

    /// Adds a pay scale row, replacing any row with the same key.
    pub fn insert_pay_scale(&self, scale: PayScale) {
        let mut tables = self.seed();
        let rows = tables.pay_scales.entry(scale.tenant_id.clone()).or_default();
        rows.retain(|r| r.key() != scale.key());
        rows.push(scale);
    }

    /// Adds or replaces a timesheet.
    pub fn insert_timesheet(&self, timesheet: Timesheet) {
        self.seed()
            .timesheets
            .insert(timesheet.id.clone(), timesheet);
    }

    /// Sets a timesheet's status.
    pub fn set_timesheet_status(&self, timesheet_id: &str, status: TimesheetStatus) {
        if let Some(timesheet) = self.seed().timesheets.get_mut(timesheet_id) {
            timesheet.status = status;
        }
    }

    /// Snapshot of a budget.
    pub fn budget(&self, budget_id: &str) -> Option<NdisBudget> {
        self.seed().budgets.get(budget_id).cloned()
    }

    /// Snapshot of the activity log.
    pub fn activity_logs(&self) -> Vec<ActivityLogEntry> {
        self.seed().activity_logs.clone()
    }

    /// Snapshot of queued notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seed().notifications.clone()
    }

    /// Count of entries recorded for a shift.
    pub fn entry_count_for_shift(&self, shift_id: &str) -> usize {
        self.seed()
            .entries
            .iter()
            .filter(|e| e.shift_id.as_deref() == Some(shift_id))
            .count()
    }
}

impl SettlementStore for MemoryStore {
    fn get_shift(&self, shift_id: &str, tenant_id: &str) -> EngineResult<Option<Shift>> {
        Ok(self
            .lock()?
            .shifts
            .get(shift_id)
            .filter(|s| s.tenant_id == tenant_id)
            .cloned())
    }

    fn list_tenants(&self) -> EngineResult<Vec<Tenant>> {
        Ok(self.lock()?.tenants.clone())
    }

    fn get_ndis_budget_by_client(
        &self,
        client_id: &str,
        tenant_id: &str,
    ) -> EngineResult<Option<NdisBudget>> {
        Ok(self
            .lock()?
            .budgets
            .values()
            .find(|b| b.client_id == client_id && b.tenant_id == tenant_id)
            .cloned())
    }

    fn get_ndis_pricing(
        &self,
        shift_type: ShiftType,
        ratio: &str,
        tenant_id: &str,
    ) -> EngineResult<Option<NdisPricing>> {
        Ok(self
            .lock()?
            .pricing
            .iter()
            .find(|p| p.shift_type == shift_type && p.ratio == ratio && p.tenant_id == tenant_id)
            .cloned())
    }

    fn commit_budget_deduction(
        &self,
        transaction: &BudgetTransaction,
    ) -> EngineResult<DeductionCommit> {
        let mut tables = self.lock()?;
        let tables = &mut *tables;

        let Some(budget) = tables.budgets.get_mut(&transaction.budget_id) else {
            return Ok(DeductionCommit::BudgetMissing);
        };

        if let Some(existing) = tables
            .transactions
            .iter()
            .find(|t| t.shift_id == transaction.shift_id && t.tenant_id == transaction.tenant_id)
        {
            return Ok(DeductionCommit::AlreadyApplied {
                transaction: existing.clone(),
                remaining: budget.category(existing.category).remaining,
            });
        }

        let balance = budget.category_mut(transaction.category);
        if !balance.try_deduct(transaction.amount) {
            return Ok(DeductionCommit::Insufficient {
                remaining: balance.remaining,
            });
        }
        let remaining = balance.remaining;

        tables.transactions.push(transaction.clone());
        Ok(DeductionCommit::Applied { remaining })
    }

    fn list_budget_transactions(&self, budget_id: &str) -> EngineResult<Vec<BudgetTransaction>> {
        Ok(self
            .lock()?
            .transactions
            .iter()
            .filter(|t| t.budget_id == budget_id)
            .cloned()
            .collect())
    }

    fn create_activity_log(&self, entry: ActivityLogEntry) -> EngineResult<()> {
        self.lock()?.activity_logs.push(entry);
        Ok(())
    }

    fn create_notification(&self, notification: Notification) -> EngineResult<()> {
        self.lock()?.notifications.push(notification);
        Ok(())
    }

    fn get_staff_member(
        &self,
        user_id: &str,
        tenant_id: &str,
    ) -> EngineResult<Option<StaffMember>> {
        Ok(self
            .lock()?
            .staff
            .get(&(tenant_id.to_string(), user_id.to_string()))
            .cloned())
    }

    fn get_pay_scale(&self, tenant_id: &str, key: PayScaleKey) -> EngineResult<Option<PayScale>> {
        Ok(self
            .lock()?
            .pay_scales
            .get(tenant_id)
            .and_then(|rows| rows.iter().find(|r| r.key() == key))
            .cloned())
    }

    fn list_pay_scales(&self, tenant_id: &str) -> EngineResult<Vec<PayScale>> {
        Ok(self
            .lock()?
            .pay_scales
            .get(tenant_id)
            .cloned()
            .unwrap_or_default())
    }

    fn apply_pay_scale_increase(
        &self,
        tenant_id: &str,
        increase_percentage: Decimal,
        effective_date: NaiveDate,
    ) -> EngineResult<usize> {
        let mut tables = self.lock()?;
        let Some(rows) = tables.pay_scales.get_mut(tenant_id) else {
            return Ok(0);
        };

        for row in rows.iter_mut() {
            row.hourly_rate = increased_rate(row.hourly_rate, increase_percentage);
            row.effective_date = effective_date;
        }
        Ok(rows.len())
    }

    fn get_tax_brackets(&self, tax_year: i32) -> EngineResult<Vec<TaxBracket>> {
        let mut brackets: Vec<TaxBracket> = self
            .lock()?
            .tax_brackets
            .iter()
            .filter(|b| b.tax_year == tax_year)
            .cloned()
            .collect();
        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));
        Ok(brackets)
    }

    fn create_tax_bracket(&self, bracket: TaxBracket) -> EngineResult<()> {
        self.lock()?.tax_brackets.push(bracket);
        Ok(())
    }

    fn find_or_create_timesheet(
        &self,
        user_id: &str,
        tenant_id: &str,
        period: PayPeriod,
    ) -> EngineResult<Timesheet> {
        let mut tables = self.lock()?;

        if let Some(existing) = tables.timesheets.values().find(|t| {
            t.user_id == user_id
                && t.tenant_id == tenant_id
                && t.pay_period_start == period.start_date
                && t.pay_period_end == period.end_date
        }) {
            return Ok(existing.clone());
        }

        let timesheet = Timesheet {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            pay_period_start: period.start_date,
            pay_period_end: period.end_date,
            status: TimesheetStatus::Draft,
            total_hours: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
        };
        tables
            .timesheets
            .insert(timesheet.id.clone(), timesheet.clone());
        Ok(timesheet)
    }

    fn get_timesheet(&self, timesheet_id: &str) -> EngineResult<Option<Timesheet>> {
        Ok(self.lock()?.timesheets.get(timesheet_id).cloned())
    }

    fn get_timesheet_entry_by_shift(
        &self,
        shift_id: &str,
    ) -> EngineResult<Option<TimesheetEntry>> {
        Ok(self
            .lock()?
            .entries
            .iter()
            .find(|e| e.shift_id.as_deref() == Some(shift_id))
            .cloned())
    }

    fn upsert_timesheet_entry(&self, entry: TimesheetEntry) -> EngineResult<TimesheetEntry> {
        let mut tables = self.lock()?;

        let existing = entry.shift_id.as_deref().and_then(|shift_id| {
            tables
                .entries
                .iter()
                .position(|e| e.shift_id.as_deref() == Some(shift_id))
        });

        let mut stored = entry;
        if let Some(index) = existing {
            stored.id = tables.entries[index].id.clone();
            stored.timesheet_id = tables.entries[index].timesheet_id.clone();
        }

        let timesheet = tables
            .timesheets
            .get(&stored.timesheet_id)
            .ok_or_else(|| EngineError::Store {
                message: format!("timesheet '{}' not found", stored.timesheet_id),
            })?;
        if timesheet.status.is_locked() {
            return Err(EngineError::TimesheetLocked {
                timesheet_id: timesheet.id.clone(),
                status: timesheet.status.to_string(),
            });
        }

        stored.updated_at = Utc::now();
        match existing {
            Some(index) => tables.entries[index] = stored.clone(),
            None => tables.entries.push(stored.clone()),
        }
        Ok(stored)
    }

    fn recalculate_timesheet_totals(&self, timesheet_id: &str) -> EngineResult<Timesheet> {
        let mut tables = self.lock()?;

        let entries: Vec<TimesheetEntry> = tables
            .entries
            .iter()
            .filter(|e| e.timesheet_id == timesheet_id)
            .cloned()
            .collect();
        let (total_hours, total_earnings) = timesheet_totals(&entries);

        let timesheet = tables
            .timesheets
            .get_mut(timesheet_id)
            .ok_or_else(|| EngineError::Store {
                message: format!("timesheet '{}' not found", timesheet_id),
            })?;
        timesheet.total_hours = total_hours;
        timesheet.total_earnings = total_earnings;
        Ok(timesheet.clone())
    }

    fn accrue_leave(
        &self,
        user_id: &str,
        tenant_id: &str,
        leave_type: LeaveType,
        hours: Decimal,
    ) -> EngineResult<LeaveBalance> {
        let mut tables = self.lock()?;
        let balance = tables
            .leave
            .entry((user_id.to_string(), tenant_id.to_string(), leave_type))
            .or_insert_with(|| LeaveBalance {
                user_id: user_id.to_string(),
                tenant_id: tenant_id.to_string(),
                leave_type,
                balance_hours: Decimal::ZERO,
            });
        if hours > Decimal::ZERO {
            balance.balance_hours += hours;
        }
        Ok(balance.clone())
    }

    fn get_leave_balance(
        &self,
        user_id: &str,
        tenant_id: &str,
        leave_type: LeaveType,
    ) -> EngineResult<Option<LeaveBalance>> {
        Ok(self
            .lock()?
            .leave
            .get(&(user_id.to_string(), tenant_id.to_string(), leave_type))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryBalance, EmploymentType, FundingCategory};
    use std::str::FromStr;
    use std::sync::Arc;
    use std::thread;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_budget(remaining: &str) -> NdisBudget {
        NdisBudget {
            id: "budget_001".to_string(),
            tenant_id: "tenant_a".to_string(),
            client_id: "client_001".to_string(),
            community_access: CategoryBalance::new(dec(remaining)),
            sil: CategoryBalance::new(Decimal::ZERO),
            capacity_building: CategoryBalance::new(Decimal::ZERO),
            price_overrides: HashMap::new(),
        }
    }

    fn create_transaction(shift_id: &str, amount: &str) -> BudgetTransaction {
        BudgetTransaction {
            id: Uuid::new_v4().to_string(),
            budget_id: "budget_001".to_string(),
            category: FundingCategory::CommunityAccess,
            shift_type: ShiftType::AM,
            ratio: "1:1".to_string(),
            hours: dec("8"),
            rate: dec("40"),
            amount: dec(amount),
            shift_id: shift_id.to_string(),
            created_by_user_id: "admin".to_string(),
            tenant_id: "tenant_a".to_string(),
            created_at: Utc::now(),
        }
    }

    fn create_pay_scale(level: u8, rate: &str) -> PayScale {
        PayScale {
            tenant_id: "tenant_a".to_string(),
            level,
            pay_point: 1,
            employment_type: EmploymentType::FullTime,
            hourly_rate: dec(rate),
            effective_date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        }
    }

    #[test]
    fn test_commit_applies_and_records_transaction() {
        let store = MemoryStore::new();
        store.insert_budget(create_budget("500.00"));

        let commit = store
            .commit_budget_deduction(&create_transaction("shift_001", "320.00"))
            .unwrap();

        assert_eq!(commit, DeductionCommit::Applied { remaining: dec("180.00") });
        assert_eq!(store.list_budget_transactions("budget_001").unwrap().len(), 1);
    }

    #[test]
    fn test_commit_bills_a_shift_once() {
        let store = MemoryStore::new();
        store.insert_budget(create_budget("1000.00"));

        let first = create_transaction("shift_001", "320.00");
        store.commit_budget_deduction(&first).unwrap();
        let commit = store
            .commit_budget_deduction(&create_transaction("shift_001", "320.00"))
            .unwrap();

        assert_eq!(
            commit,
            DeductionCommit::AlreadyApplied {
                transaction: first,
                remaining: dec("680.00"),
            }
        );
        assert_eq!(store.list_budget_transactions("budget_001").unwrap().len(), 1);
        let budget = store.budget("budget_001").unwrap();
        assert_eq!(budget.community_access.remaining, dec("680.00"));
    }

    #[test]
    fn test_concurrent_retries_bill_once() {
        let store = Arc::new(MemoryStore::new());
        store.insert_budget(create_budget("1000.00"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .commit_budget_deduction(&create_transaction("shift_001", "320.00"))
                        .unwrap()
                })
            })
            .collect();

        let applied = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|c| matches!(c, DeductionCommit::Applied { .. }))
            .count();

        assert_eq!(applied, 1);
        let budget = store.budget("budget_001").unwrap();
        assert_eq!(budget.community_access.remaining, dec("680.00"));
    }

    #[test]
    fn test_commit_insufficient_writes_nothing() {
        let store = MemoryStore::new();
        store.insert_budget(create_budget("100.00"));

        let commit = store
            .commit_budget_deduction(&create_transaction("shift_001", "320.00"))
            .unwrap();

        assert_eq!(commit, DeductionCommit::Insufficient { remaining: dec("100.00") });
        assert!(store.list_budget_transactions("budget_001").unwrap().is_empty());
        let budget = store.budget("budget_001").unwrap();
        assert_eq!(budget.community_access.remaining, dec("100.00"));
    }

    #[test]
    fn test_commit_against_missing_budget() {
        let store = MemoryStore::new();
        let commit = store
            .commit_budget_deduction(&create_transaction("shift_001", "10.00"))
            .unwrap();
        assert_eq!(commit, DeductionCommit::BudgetMissing);
    }

    #[test]
    fn test_concurrent_deductions_never_overdraw() {
        let store = Arc::new(MemoryStore::new());
        store.insert_budget(create_budget("1000.00"));

        // 10 shifts at $320 against $1000: exactly 3 can succeed.
        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store
                        .commit_budget_deduction(&create_transaction(&format!("shift_{i}"), "320.00"))
                        .unwrap()
                })
            })
            .collect();

        let applied = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|c| matches!(c, DeductionCommit::Applied { .. }))
            .count();

        assert_eq!(applied, 3);
        let budget = store.budget("budget_001").unwrap();
        assert_eq!(budget.community_access.remaining, dec("40.00"));
        assert_eq!(budget.community_access.spent, dec("960.00"));
        assert_eq!(store.list_budget_transactions("budget_001").unwrap().len(), 3);
    }

    #[test]
    fn test_apply_pay_scale_increase_updates_every_row() {
        let store = MemoryStore::new();
        store.insert_pay_scale(create_pay_scale(1, "30.00"));
        store.insert_pay_scale(create_pay_scale(2, "32.00"));

        let effective = NaiveDate::from_ymd_opt(2027, 7, 1).unwrap();
        let updated = store
            .apply_pay_scale_increase("tenant_a", dec("10"), effective)
            .unwrap();

        assert_eq!(updated, 2);
        let rows = store.list_pay_scales("tenant_a").unwrap();
        assert!(rows.iter().any(|r| r.level == 1 && r.hourly_rate == dec("33.00")));
        assert!(rows.iter().any(|r| r.level == 2 && r.hourly_rate == dec("35.20")));
        assert!(rows.iter().all(|r| r.effective_date == effective));
    }

    #[test]
    fn test_increase_reads_rate_at_commit_time() {
        let store = MemoryStore::new();
        store.insert_pay_scale(create_pay_scale(1, "30.00"));
        let preview = store.list_pay_scales("tenant_a").unwrap();

        // An edit lands between the preview and the increase.
        store.insert_pay_scale(create_pay_scale(1, "40.00"));
        let effective = NaiveDate::from_ymd_opt(2027, 7, 1).unwrap();
        store
            .apply_pay_scale_increase("tenant_a", dec("10"), effective)
            .unwrap();

        assert_eq!(preview[0].hourly_rate, dec("30.00"));
        let rows = store.list_pay_scales("tenant_a").unwrap();
        assert_eq!(rows[0].hourly_rate, dec("44.00"));
    }

    #[test]
    fn test_increase_for_tenant_without_rows() {
        let store = MemoryStore::new();
        let effective = NaiveDate::from_ymd_opt(2027, 7, 1).unwrap();
        assert_eq!(
            store
                .apply_pay_scale_increase("tenant_z", dec("5"), effective)
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_find_or_create_timesheet_is_stable() {
        let store = MemoryStore::new();
        let period = PayPeriod {
            start_date: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 1, 25).unwrap(),
        };
        let first = store.find_or_create_timesheet("user_001", "tenant_a", period).unwrap();
        let second = store.find_or_create_timesheet("user_001", "tenant_a", period).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.status, TimesheetStatus::Draft);
    }

    #[test]
    fn test_accrue_leave_ignores_negative_hours() {
        let store = MemoryStore::new();
        store
            .accrue_leave("user_001", "tenant_a", LeaveType::Annual, dec("2.5"))
            .unwrap();
        let balance = store
            .accrue_leave("user_001", "tenant_a", LeaveType::Annual, dec("-1"))
            .unwrap();
        assert_eq!(balance.balance_hours, dec("2.5"));
    }

    #[test]
    fn test_shift_lookup_is_tenant_scoped() {
        let store = MemoryStore::new();
        store.insert_shift(Shift {
            id: "shift_001".to_string(),
            tenant_id: "tenant_a".to_string(),
            client_id: None,
            user_id: None,
            start_time: None,
            end_time: None,
            status: crate::models::ShiftStatus::Pending,
            staff_ratio: "1:1".to_string(),
            funding_category: None,
            shift_type: None,
        });
        assert!(store.get_shift("shift_001", "tenant_a").unwrap().is_some());
        assert!(store.get_shift("shift_001", "tenant_b").unwrap().is_none());
    }
}
