//! Startup data for the in-memory store.
//!
//! The binary has no database behind it, so tenants, staff, pay scales,
//! pricing, budgets and open shifts are read from a YAML file and loaded
//! into a [`MemoryStore`] before the server starts.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    CategoryBalance, NdisBudget, NdisPricing, PayScale, Shift, ShiftType, StaffMember, Tenant,
};

use super::MemoryStore;

/// A budget as written in a seed file: allocations only, nothing spent.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedBudget {
    /// Unique identifier for the budget.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// The participant this budget funds.
    pub client_id: String,
    /// Community access allocation.
    #[serde(default)]
    pub community_access: Decimal,
    /// SIL allocation.
    #[serde(default)]
    pub sil: Decimal,
    /// Capacity building allocation.
    #[serde(default)]
    pub capacity_building: Decimal,
    /// Client-specific hourly rates keyed by shift type.
    #[serde(default)]
    pub price_overrides: HashMap<ShiftType, Decimal>,
}

impl From<SeedBudget> for NdisBudget {
    fn from(seed: SeedBudget) -> Self {
        NdisBudget {
            id: seed.id,
            tenant_id: seed.tenant_id,
            client_id: seed.client_id,
            community_access: CategoryBalance::new(seed.community_access),
            sil: CategoryBalance::new(seed.sil),
            capacity_building: CategoryBalance::new(seed.capacity_building),
            price_overrides: seed.price_overrides,
        }
    }
}

/// Records loaded into a fresh store at startup.
///
/// # Example
///
/// ```
/// use settlement_engine::store::{MemoryStore, SeedData, SettlementStore};
///
/// let seed = SeedData::from_yaml_str("tenants:\n  - { id: tenant_a, name: Acme Care }\n").unwrap();
/// let store = MemoryStore::new();
/// assert_eq!(seed.populate(&store), 1);
/// assert_eq!(store.list_tenants().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    /// Provider organisations.
    pub tenants: Vec<Tenant>,
    /// Support workers.
    pub staff: Vec<StaffMember>,
    /// Award rates per tenant.
    pub pay_scales: Vec<PayScale>,
    /// NDIS pricing table rows.
    pub pricing: Vec<NdisPricing>,
    /// Client budgets.
    pub budgets: Vec<SeedBudget>,
    /// Scheduled or completed shifts.
    pub shifts: Vec<Shift>,
}

impl SeedData {
    /// Loads seed data from a YAML file.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is malformed or references an undeclared
    /// tenant.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses seed data from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, source: &str) -> EngineResult<Self> {
        let seed: SeedData =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        seed.validate(source)?;
        Ok(seed)
    }

    fn validate(&self, source: &str) -> EngineResult<()> {
        let tenants: HashSet<&str> = self.tenants.iter().map(|t| t.id.as_str()).collect();

        let mut owners = self
            .staff
            .iter()
            .map(|s| ("staff", s.tenant_id.as_str()))
            .chain(self.pay_scales.iter().map(|p| ("pay_scales", p.tenant_id.as_str())))
            .chain(self.pricing.iter().map(|p| ("pricing", p.tenant_id.as_str())))
            .chain(self.budgets.iter().map(|b| ("budgets", b.tenant_id.as_str())))
            .chain(self.shifts.iter().map(|s| ("shifts", s.tenant_id.as_str())));

        if let Some((table, tenant_id)) = owners.find(|(_, t)| !tenants.contains(t)) {
            return Err(EngineError::ConfigParseError {
                path: source.to_string(),
                message: format!("{} references unknown tenant '{}'", table, tenant_id),
            });
        }
        Ok(())
    }

    /// Inserts every record into `store`, returning how many were loaded.
    pub fn populate(self, store: &MemoryStore) -> usize {
        let mut loaded = 0;
        for tenant in self.tenants {
            store.insert_tenant(tenant);
            loaded += 1;
        }
        for staff in self.staff {
            store.insert_staff_member(staff);
            loaded += 1;
        }
        for scale in self.pay_scales {
            store.insert_pay_scale(scale);
            loaded += 1;
        }
        for pricing in self.pricing {
            store.insert_pricing(pricing);
            loaded += 1;
        }
        for budget in self.budgets {
            store.insert_budget(budget.into());
            loaded += 1;
        }
        for shift in self.shifts {
            store.insert_shift(shift);
            loaded += 1;
        }
        loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{EmploymentType, PayScaleKey};
    use crate::services::{DeductionOutcome, TimesheetOutcome, settle_completed_shift};
    use crate::store::SettlementStore;
    use chrono::NaiveDateTime;

    fn seed_path() -> &'static str {
        "./config/seed.yaml"
    }

    #[test]
    fn test_load_shipped_seed() {
        let seed = SeedData::load(seed_path()).expect("shipped seed should load");
        let store = MemoryStore::new();
        let loaded = seed.populate(&store);

        assert!(loaded > 0);
        assert_eq!(store.list_tenants().unwrap().len(), 2);
        assert!(store.get_shift("shift_001", "tenant_a").unwrap().is_some());

        let staff = store.get_staff_member("user_001", "tenant_a").unwrap().unwrap();
        assert_eq!(staff.employment_type, EmploymentType::FullTime);
        let key = PayScaleKey {
            level: 2,
            pay_point: 1,
            employment_type: EmploymentType::FullTime,
        };
        let scale = store.get_pay_scale("tenant_a", key).unwrap().unwrap();
        assert_eq!(scale.hourly_rate, Decimal::from(40));
    }

    #[test]
    fn test_seeded_budget_starts_unspent() {
        let store = MemoryStore::new();
        SeedData::load(seed_path()).unwrap().populate(&store);

        let budget = store.budget("budget_001").unwrap();
        assert_eq!(budget.community_access.spent, Decimal::ZERO);
        assert_eq!(
            budget.community_access.remaining,
            budget.community_access.allocated
        );
    }

    #[test]
    fn test_seeded_shift_settles() {
        let store = MemoryStore::new();
        SeedData::load(seed_path()).unwrap().populate(&store);
        let submitted_at =
            NaiveDateTime::parse_from_str("2026-01-15 17:05:00", "%Y-%m-%d %H:%M:%S").unwrap();

        let report = settle_completed_shift(
            &store,
            &EngineConfig::default(),
            "shift_001",
            "tenant_a",
            "admin",
            submitted_at,
        );

        assert!(matches!(report.billing, Some(DeductionOutcome::Applied { .. })));
        assert!(matches!(report.pay, Some(TimesheetOutcome::Settled { .. })));
    }

    #[test]
    fn test_missing_seed_file_returns_config_not_found() {
        let result = SeedData::load("./config/does-not-exist.yaml");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_unknown_tenant_is_rejected() {
        let yaml = r#"
tenants:
  - { id: tenant_a, name: Acme Care }
budgets:
  - { id: budget_009, tenant_id: tenant_z, client_id: client_009, community_access: "100" }
"#;
        match SeedData::from_yaml_str(yaml) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("tenant_z"));
            }
            other => panic!("expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_seed_loads_nothing() {
        let store = MemoryStore::new();
        assert_eq!(SeedData::from_yaml_str("{}").unwrap().populate(&store), 0);
        assert!(store.list_tenants().unwrap().is_empty());
    }
}
