//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to engine configuration.
///
/// # Example
///
/// ```no_run
/// use settlement_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/settlement.yaml").unwrap();
/// println!("Pay runs per year: {}", loader.config().payroll.periods_per_year);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// Returns `ConfigNotFound` if the file cannot be read and
    /// `ConfigParseError` if it is not valid configuration YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse(&content, &path_str)
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> EngineResult<Self> {
        Self::parse(content, "<inline>")
    }

    fn parse(content: &str, source: &str) -> EngineResult<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;

        Self::validate(&config, source)?;
        Ok(Self { config })
    }

    fn validate(config: &EngineConfig, source: &str) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: source.to_string(),
            message: message.to_string(),
        };

        if config.payroll.periods_per_year == 0 {
            return Err(invalid("payroll.periods_per_year must be positive"));
        }
        if config.tax_brackets.is_empty() {
            return Err(invalid("tax_brackets must not be empty"));
        }
        if config
            .tax_brackets
            .windows(2)
            .any(|pair| pair[0].min_income >= pair[1].min_income)
        {
            return Err(invalid("tax_brackets must be ordered by min_income"));
        }
        if config.timesheet.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(invalid("timesheet.utc_offset_minutes must be within one day"));
        }
        if chrono::NaiveDate::from_ymd_opt(
            2024,
            config.wage_increase.annual_increase_month,
            config.wage_increase.annual_increase_day,
        )
        .is_none()
        {
            return Err(invalid("wage_increase annual increase date is not a valid day"));
        }
        Ok(())
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/settlement.yaml"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_shipped_configuration() {
        let loader = ConfigLoader::load(config_path()).expect("shipped config should load");
        let config = loader.config();
        assert_eq!(config.payroll.periods_per_year, 26);
        assert_eq!(config.payroll.medicare_levy_rate, dec("0.02"));
        assert_eq!(config.payroll.super_rate, dec("0.11"));
        assert_eq!(config.payroll.leave_accrual.annual, dec("0.0769"));
        assert_eq!(config.tax_brackets.len(), 5);
        assert_eq!(config.wage_increase.max_percentage, dec("50"));
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loaded = ConfigLoader::load(config_path()).unwrap().into_config();
        let defaults = EngineConfig::default();
        assert_eq!(
            loaded.payroll.statutory_minimum_hourly_rate,
            defaults.payroll.statutory_minimum_hourly_rate
        );
        assert_eq!(
            loaded.timesheet.pay_period_anchor,
            defaults.timesheet.pay_period_anchor
        );
        assert_eq!(
            loaded.timesheet.utc_offset_minutes,
            defaults.timesheet.utc_offset_minutes
        );
        for (a, b) in loaded.tax_brackets.iter().zip(defaults.tax_brackets.iter()) {
            assert_eq!(a.min_income, b.min_income);
            assert_eq!(a.max_income, b.max_income);
            assert_eq!(a.rate, b.rate);
            assert_eq!(a.base_tax, b.base_tax);
        }
    }

    #[test]
    fn test_missing_file_returns_config_not_found() {
        let result = ConfigLoader::load("./config/does-not-exist.yaml");
        assert!(matches!(result, Err(EngineError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_invalid_yaml_returns_parse_error() {
        let result = ConfigLoader::from_yaml_str("payroll: [not, a, map");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_partial_yaml_uses_defaults_for_missing_sections() {
        let loader = ConfigLoader::from_yaml_str("payroll:\n  periods_per_year: 52\n").unwrap();
        let config = loader.config();
        assert_eq!(config.payroll.periods_per_year, 52);
        assert_eq!(config.payroll.super_rate, dec("0.11"));
        assert_eq!(config.timesheet.pay_period_days, 14);
        assert_eq!(config.tax_brackets.len(), 5);
    }

    #[test]
    fn test_zero_periods_per_year_is_rejected() {
        let result = ConfigLoader::from_yaml_str("payroll:\n  periods_per_year: 0\n");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_offset_beyond_a_day_is_rejected() {
        let result = ConfigLoader::from_yaml_str("timesheet:\n  utc_offset_minutes: -1440\n");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));

        let loader = ConfigLoader::from_yaml_str("timesheet:\n  utc_offset_minutes: 570\n").unwrap();
        assert_eq!(loader.config().timesheet.utc_offset_minutes, 570);
    }

    #[test]
    fn test_unordered_brackets_are_rejected() {
        let yaml = r#"
tax_brackets:
  - { min_income: "45000", max_income: "120000", rate: "0.325", base_tax: "5092" }
  - { min_income: "0", max_income: "45000", rate: "0.19", base_tax: "0" }
"#;
        let result = ConfigLoader::from_yaml_str(yaml);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
