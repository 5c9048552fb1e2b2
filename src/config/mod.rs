//! Configuration loading and management for the settlement engine.
//!
//! This module loads payroll constants, pay-period settings, wage-increase
//! policy and the default tax table from a YAML file.
//!
//! # Example
//!
//! ```no_run
//! use settlement_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/settlement.yaml").unwrap();
//! println!("Super rate: {}", config.config().payroll.super_rate);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    EngineConfig, LeaveAccrualRates, PayrollConfig, TaxBracketConfig, TimesheetConfig,
    WageIncreaseConfig, default_tax_brackets,
};
