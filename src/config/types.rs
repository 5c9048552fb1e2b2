//! Configuration types for the settlement engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section has a
//! `Default` matching the shipped `config/settlement.yaml`, so a missing
//! section falls back to statutory values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Hours of leave accrued per hour worked.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveAccrualRates {
    /// Annual leave rate.
    pub annual: Decimal,
    /// Sick leave rate.
    pub sick: Decimal,
    /// Personal leave rate.
    pub personal: Decimal,
    /// Long service leave rate.
    pub long_service: Decimal,
}

impl Default for LeaveAccrualRates {
    fn default() -> Self {
        Self {
            annual: Decimal::new(769, 4),
            sick: Decimal::new(384, 4),
            personal: Decimal::new(192, 4),
            long_service: Decimal::new(65, 4),
        }
    }
}

/// Payroll constants.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayrollConfig {
    /// Pay runs per year; 26 for fortnightly.
    pub periods_per_year: u32,
    /// Medicare levy as a fraction of gross pay.
    pub medicare_levy_rate: Decimal,
    /// Superannuation guarantee as a fraction of gross pay.
    pub super_rate: Decimal,
    /// Hourly rate used when no pay scale row matches a worker.
    pub statutory_minimum_hourly_rate: Decimal,
    /// Leave accrual rates for permanent staff.
    pub leave_accrual: LeaveAccrualRates,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            periods_per_year: 26,
            medicare_levy_rate: Decimal::new(2, 2),
            super_rate: Decimal::new(11, 2),
            statutory_minimum_hourly_rate: Decimal::new(2423, 2),
            leave_accrual: LeaveAccrualRates::default(),
        }
    }
}

/// Timesheet pay-period settings.
///
/// Shift times are the provider's local wall-clock times with no zone
/// attached. `utc_offset_minutes` says which zone that is, so the server
/// clock can be read in the same frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimesheetConfig {
    /// Length of a pay period in days.
    pub pay_period_days: u32,
    /// A date on which some pay period starts.
    pub pay_period_anchor: NaiveDate,
    /// Offset of provider local time from UTC, in minutes. 600 is AEST.
    pub utc_offset_minutes: i32,
}

impl TimesheetConfig {
    /// The provider's local wall-clock time at `instant`.
    ///
    /// An offset outside a day is rejected at load; one set in code falls
    /// back to UTC.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)) {
            Some(offset) => instant.with_timezone(&offset).naive_local(),
            None => instant.naive_utc(),
        }
    }

    /// The provider's local wall-clock time now.
    pub fn local_now(&self) -> NaiveDateTime {
        self.local_time(Utc::now())
    }
}

impl Default for TimesheetConfig {
    fn default() -> Self {
        Self {
            pay_period_days: 14,
            pay_period_anchor: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            utc_offset_minutes: 600,
        }
    }
}

/// Batch wage-increase policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WageIncreaseConfig {
    /// Largest accepted increase, in percent.
    pub max_percentage: Decimal,
    /// Month of the scheduled annual increase.
    pub annual_increase_month: u32,
    /// Day of the scheduled annual increase.
    pub annual_increase_day: u32,
    /// Days an effective date may sit away from the annual increase before warning.
    pub warning_window_days: i64,
    /// Rows shown by a preview.
    pub preview_sample_size: usize,
}

impl Default for WageIncreaseConfig {
    fn default() -> Self {
        Self {
            max_percentage: Decimal::from(50),
            annual_increase_month: 7,
            annual_increase_day: 1,
            warning_window_days: 90,
            preview_sample_size: 10,
        }
    }
}

/// A tax band as written in configuration, without a year.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxBracketConfig {
    /// Lower bound of the band.
    pub min_income: Decimal,
    /// Upper bound of the band; absent for the top band.
    #[serde(default)]
    pub max_income: Option<Decimal>,
    /// Marginal rate.
    pub rate: Decimal,
    /// Tax accumulated below the band.
    pub base_tax: Decimal,
}

/// The default progressive table seeded when a tax year has no brackets.
pub fn default_tax_brackets() -> Vec<TaxBracketConfig> {
    let band = |min: i64, max: Option<i64>, rate: Decimal, base: i64| TaxBracketConfig {
        min_income: Decimal::from(min),
        max_income: max.map(Decimal::from),
        rate,
        base_tax: Decimal::from(base),
    };
    vec![
        band(0, Some(18_200), Decimal::ZERO, 0),
        band(18_200, Some(45_000), Decimal::new(19, 2), 0),
        band(45_000, Some(120_000), Decimal::new(325, 3), 5_092),
        band(120_000, Some(180_000), Decimal::new(37, 2), 29_467),
        band(180_000, None, Decimal::new(45, 2), 51_667),
    ]
}

/// The complete engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Payroll constants.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Timesheet settings.
    #[serde(default)]
    pub timesheet: TimesheetConfig,
    /// Wage-increase policy.
    #[serde(default)]
    pub wage_increase: WageIncreaseConfig,
    /// Default tax table.
    #[serde(default = "default_tax_brackets")]
    pub tax_brackets: Vec<TaxBracketConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            payroll: PayrollConfig::default(),
            timesheet: TimesheetConfig::default(),
            wage_increase: WageIncreaseConfig::default(),
            tax_brackets: default_tax_brackets(),
        }
    }
}
