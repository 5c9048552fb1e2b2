//! Leave balance models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kinds of paid leave tracked per worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    /// Annual leave.
    Annual,
    /// Sick leave.
    Sick,
    /// Personal / carer's leave.
    Personal,
    /// Long service leave.
    LongService,
}

impl LeaveType {
    /// All leave types in a stable order.
    pub const ALL: [LeaveType; 4] = [
        LeaveType::Annual,
        LeaveType::Sick,
        LeaveType::Personal,
        LeaveType::LongService,
    ];
}

/// Hours of leave earned for one pay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LeaveAccrual {
    /// Annual leave hours.
    pub annual: Decimal,
    /// Sick leave hours.
    pub sick: Decimal,
    /// Personal leave hours.
    pub personal: Decimal,
    /// Long service leave hours.
    pub long_service: Decimal,
}

impl LeaveAccrual {
    /// Returns the accrued hours for one leave type.
    pub fn hours(&self, leave_type: LeaveType) -> Decimal {
        match leave_type {
            LeaveType::Annual => self.annual,
            LeaveType::Sick => self.sick,
            LeaveType::Personal => self.personal,
            LeaveType::LongService => self.long_service,
        }
    }

    /// True when nothing was accrued.
    pub fn is_zero(&self) -> bool {
        LeaveType::ALL.iter().all(|t| self.hours(*t).is_zero())
    }
}

/// Running leave balance for a worker and leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The worker.
    pub user_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Kind of leave.
    pub leave_type: LeaveType,
    /// Accrued hours available.
    pub balance_hours: Decimal,
}
