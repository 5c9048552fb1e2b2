//! Shift model and related types.
//!
//! A shift carries its *scheduled* times, which are the billing source of
//! truth. The moment a worker submits completion is a separate signal and is
//! never written back onto the shift.

use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::FundingCategory;

/// Lifecycle status of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Created but not yet assigned.
    Pending,
    /// Assigned to a worker.
    Assigned,
    /// Worker has started the shift.
    InProgress,
    /// Worker has completed the shift.
    Completed,
    /// Shift was cancelled.
    Cancelled,
}

/// The pricing category of a shift.
///
/// The first three are derived from the start hour. `Sleepover` only ever
/// arrives as an explicit shift type set by the scheduling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftType {
    /// Day shift, starting in [06:00, 20:00).
    AM,
    /// Evening shift, starting in [20:00, 24:00).
    PM,
    /// Active overnight shift, starting in [00:00, 06:00).
    ActiveNight,
    /// Overnight sleepover.
    Sleepover,
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShiftType::AM => "AM",
            ShiftType::PM => "PM",
            ShiftType::ActiveNight => "ActiveNight",
            ShiftType::Sleepover => "Sleepover",
        };
        f.write_str(label)
    }
}

/// Represents a scheduled support shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    /// Unique identifier for the shift.
    pub id: String,
    /// The tenant (provider organisation) owning the shift.
    pub tenant_id: String,
    /// The client receiving support, if any.
    #[serde(default)]
    pub client_id: Option<String>,
    /// The assigned support worker, if any.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Scheduled start, in the provider's local wall-clock time.
    #[serde(default)]
    pub start_time: Option<NaiveDateTime>,
    /// Scheduled end, in the provider's local wall-clock time.
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Lifecycle status.
    pub status: ShiftStatus,
    /// Staff-to-client ratio, e.g. "1:1".
    pub staff_ratio: String,
    /// Funding category explicitly chosen for billing.
    #[serde(default)]
    pub funding_category: Option<FundingCategory>,
    /// Shift type explicitly set by scheduling; wins over time classification.
    #[serde(default)]
    pub shift_type: Option<ShiftType>,
}

impl Shift {
    /// Returns the scheduled start and end when both are present.
    pub fn scheduled_window(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.start_time?, self.end_time?))
    }

    /// Scheduled duration in whole minutes, if both times are set.
    pub fn scheduled_minutes(&self) -> Option<i64> {
        self.scheduled_window()
            .map(|(start, end)| (end - start).num_minutes())
    }

    /// Scheduled duration in hours as a Decimal.
    ///
    /// # Examples
    ///
    /// ```
    /// use settlement_engine::models::{Shift, ShiftStatus};
    /// use chrono::NaiveDateTime;
    /// use rust_decimal::Decimal;
    ///
    /// let shift = Shift {
    ///     id: "shift_001".to_string(),
    ///     tenant_id: "tenant_a".to_string(),
    ///     client_id: None,
    ///     user_id: None,
    ///     start_time: NaiveDateTime::parse_from_str("2026-01-15 09:00:00", "%Y-%m-%d %H:%M:%S").ok(),
    ///     end_time: NaiveDateTime::parse_from_str("2026-01-15 17:30:00", "%Y-%m-%d %H:%M:%S").ok(),
    ///     status: ShiftStatus::Completed,
    ///     staff_ratio: "1:1".to_string(),
    ///     funding_category: None,
    ///     shift_type: None,
    /// };
    /// assert_eq!(shift.scheduled_hours(), Some(Decimal::new(85, 1)));
    /// ```
    pub fn scheduled_hours(&self) -> Option<Decimal> {
        self.scheduled_minutes()
            .map(|minutes| Decimal::from(minutes) / Decimal::from(60))
    }
}
