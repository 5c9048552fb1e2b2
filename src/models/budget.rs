//! NDIS budget models.
//!
//! A client's budget is split into independent funding categories. Each
//! category balance is only ever reduced through a [`BudgetTransaction`].

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ShiftType;

/// One of a client's independent NDIS spending pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundingCategory {
    /// Core supports for community participation.
    CommunityAccess,
    /// Supported Independent Living.
    SIL,
    /// Capacity building supports.
    CapacityBuilding,
}

impl fmt::Display for FundingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FundingCategory::CommunityAccess => "CommunityAccess",
            FundingCategory::SIL => "SIL",
            FundingCategory::CapacityBuilding => "CapacityBuilding",
        };
        f.write_str(label)
    }
}

/// Balance of a single funding category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBalance {
    /// Total funds allocated to the category.
    pub allocated: Decimal,
    /// Funds consumed so far.
    pub spent: Decimal,
    /// Funds still available. Never negative.
    pub remaining: Decimal,
}

impl CategoryBalance {
    /// A fresh balance with nothing spent.
    pub fn new(allocated: Decimal) -> Self {
        Self {
            allocated,
            spent: Decimal::ZERO,
            remaining: allocated,
        }
    }

    /// Moves `amount` from remaining to spent if the balance covers it.
    ///
    /// Returns false and leaves the balance untouched otherwise.
    pub fn try_deduct(&mut self, amount: Decimal) -> bool {
        if amount < Decimal::ZERO || self.remaining < amount {
            return false;
        }
        self.remaining -= amount;
        self.spent += amount;
        true
    }
}

/// A client's NDIS budget within a tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdisBudget {
    /// Unique identifier for the budget.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// The participant this budget funds.
    pub client_id: String,
    /// Community access category.
    pub community_access: CategoryBalance,
    /// Supported Independent Living category.
    pub sil: CategoryBalance,
    /// Capacity building category.
    pub capacity_building: CategoryBalance,
    /// Client-specific hourly rates keyed by shift type.
    #[serde(default)]
    pub price_overrides: HashMap<ShiftType, Decimal>,
}

impl NdisBudget {
    /// Returns the balance for a category.
    pub fn category(&self, category: FundingCategory) -> &CategoryBalance {
        match category {
            FundingCategory::CommunityAccess => &self.community_access,
            FundingCategory::SIL => &self.sil,
            FundingCategory::CapacityBuilding => &self.capacity_building,
        }
    }

    /// Returns the mutable balance for a category.
    pub fn category_mut(&mut self, category: FundingCategory) -> &mut CategoryBalance {
        match category {
            FundingCategory::CommunityAccess => &mut self.community_access,
            FundingCategory::SIL => &mut self.sil,
            FundingCategory::CapacityBuilding => &mut self.capacity_building,
        }
    }

    /// Returns the client's override rate for a shift type, if any.
    pub fn price_override(&self, shift_type: ShiftType) -> Option<Decimal> {
        self.price_overrides.get(&shift_type).copied()
    }
}

/// A row of the tenant-wide NDIS pricing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdisPricing {
    /// Owning tenant.
    pub tenant_id: String,
    /// Shift type priced by this row.
    pub shift_type: ShiftType,
    /// Staff ratio priced by this row.
    pub ratio: String,
    /// Billable hourly rate.
    pub rate: Decimal,
}

/// Immutable record of one successful budget deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetTransaction {
    /// Unique identifier for the transaction.
    pub id: String,
    /// The budget that was charged.
    pub budget_id: String,
    /// The category that was charged.
    pub category: FundingCategory,
    /// Shift type used for pricing.
    pub shift_type: ShiftType,
    /// Staff ratio of the shift.
    pub ratio: String,
    /// Scheduled hours billed.
    pub hours: Decimal,
    /// Hourly rate billed.
    pub rate: Decimal,
    /// Charged amount: hours × rate rounded to cents.
    pub amount: Decimal,
    /// The shift being billed.
    pub shift_id: String,
    /// User that triggered the deduction.
    pub created_by_user_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// When the transaction was recorded.
    pub created_at: DateTime<Utc>,
}

/// Negative result returned when a category cannot cover a shift's cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsufficientFundsNotice {
    /// The shift that could not be billed.
    pub shift_id: String,
    /// The budget that was checked.
    pub budget_id: String,
    /// The category that was checked.
    pub category: FundingCategory,
    /// Cost of the shift.
    pub required: Decimal,
    /// Balance at the time of the check.
    pub remaining: Decimal,
}
