//! Staff member and pay scale models.
//!
//! Employment type labels arrive from upstream systems in several spellings
//! ("part_time", "parttime", "Part-Time", ...). They are normalized here, at
//! the deserialization boundary, into the closed [`EmploymentType`] union.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum EmploymentType {
    /// Full-time employment.
    FullTime,
    /// Part-time employment with a regular pattern.
    PartTime,
    /// Casual employment; no leave accrual.
    Casual,
}

impl EmploymentType {
    /// Parses any known spelling of an employment type.
    ///
    /// Case, hyphens, underscores and spaces are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use settlement_engine::models::EmploymentType;
    ///
    /// assert_eq!(EmploymentType::parse_label("part-time"), Some(EmploymentType::PartTime));
    /// assert_eq!(EmploymentType::parse_label("PARTTIME"), Some(EmploymentType::PartTime));
    /// assert_eq!(EmploymentType::parse_label("contractor"), None);
    /// ```
    pub fn parse_label(label: &str) -> Option<Self> {
        let key: String = label
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "fulltime" | "ft" => Some(EmploymentType::FullTime),
            "parttime" | "pt" => Some(EmploymentType::PartTime),
            "casual" => Some(EmploymentType::Casual),
            _ => None,
        }
    }

    /// Returns true for employment types that accrue paid leave.
    pub fn accrues_leave(&self) -> bool {
        matches!(self, EmploymentType::FullTime | EmploymentType::PartTime)
    }

    /// Canonical snake_case label.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
            EmploymentType::Casual => "casual",
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s).ok_or_else(|| format!("unknown employment type '{}'", s))
    }
}

/// Unknown labels fall back to casual, which never accrues leave.
impl From<String> for EmploymentType {
    fn from(label: String) -> Self {
        Self::parse_label(&label).unwrap_or_else(|| {
            warn!(label = %label, "Unknown employment type, treating as casual");
            EmploymentType::Casual
        })
    }
}

/// A support worker as seen by payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    /// Unique identifier for the user.
    pub id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Normalized employment type.
    pub employment_type: EmploymentType,
    /// ScHADS classification level.
    #[serde(default)]
    pub level: Option<u8>,
    /// Pay point within the level.
    #[serde(default)]
    pub pay_point: Option<u8>,
}

/// Key of a pay scale row within a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayScaleKey {
    /// ScHADS classification level.
    pub level: u8,
    /// Pay point within the level.
    pub pay_point: u8,
    /// Employment type the rate applies to.
    pub employment_type: EmploymentType,
}

/// A tenant's hourly rate for one (level, pay point, employment type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayScale {
    /// Owning tenant.
    pub tenant_id: String,
    /// ScHADS classification level.
    pub level: u8,
    /// Pay point within the level.
    pub pay_point: u8,
    /// Employment type the rate applies to.
    pub employment_type: EmploymentType,
    /// Hourly rate.
    pub hourly_rate: Decimal,
    /// Date the current rate took effect.
    pub effective_date: NaiveDate,
}

impl PayScale {
    /// Returns this row's key.
    pub fn key(&self) -> PayScaleKey {
        PayScaleKey {
            level: self.level,
            pay_point: self.pay_point,
            employment_type: self.employment_type,
        }
    }
}
