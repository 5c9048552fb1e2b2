//! Shift settlement and payroll engine for NDIS disability-support providers.
//!
//! This crate turns completed support shifts into money movements: it
//! deducts the billed cost from the client's NDIS budget, settles the
//! worker's paid hours into a fortnightly timesheet, computes pay-run tax,
//! Medicare, super and leave accrual, and applies yearly wage increases to
//! every tenant's pay scale.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
