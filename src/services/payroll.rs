//! Pay-run calculation and leave accrual.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calculation::{
    PayrollBreakdown, PayrollInputs, calculate_payroll_breakdown, tax_year_for,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{EmploymentType, LeaveAccrual, LeaveBalance, LeaveType, TaxBracket};
use crate::store::SettlementStore;

use super::hourly_rate::get_user_hourly_rate;

/// A worker's pay-run breakdown with the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollCalculation {
    /// Worker being paid.
    pub user_id: String,
    /// Owning tenant.
    pub tenant_id: String,
    /// Tax year whose brackets were applied.
    pub tax_year: i32,
    /// Worker's employment type.
    pub employment_type: EmploymentType,
    /// Worker's hourly rate.
    pub hourly_rate: Decimal,
    /// Tax, levy, super, net pay and leave.
    #[serde(flatten)]
    pub breakdown: PayrollBreakdown,
}

/// Loads the bracket table for a tax year, seeding it from configuration
/// when the store has none.
///
/// Seeding happens at most once per call. If the table is still empty after
/// seeding the call fails with `ConfigurationMissing`.
pub fn load_tax_brackets(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    tax_year: i32,
) -> EngineResult<Vec<TaxBracket>> {
    let brackets = store.get_tax_brackets(tax_year)?;
    if !brackets.is_empty() {
        return Ok(brackets);
    }

    info!(
        tax_year,
        brackets = config.tax_brackets.len(),
        "Seeding default tax brackets"
    );
    for bracket in &config.tax_brackets {
        store.create_tax_bracket(TaxBracket {
            tax_year,
            min_income: bracket.min_income,
            max_income: bracket.max_income,
            rate: bracket.rate,
            base_tax: bracket.base_tax,
        })?;
    }

    let brackets = store.get_tax_brackets(tax_year)?;
    if brackets.is_empty() {
        return Err(EngineError::ConfigurationMissing {
            message: format!("no tax brackets available for tax year {}", tax_year),
        });
    }
    Ok(brackets)
}

/// Calculates a pay run for a worker.
///
/// `today` selects the tax year. Workers without a staff profile are paid
/// as casual staff at the statutory minimum rate.
pub fn calculate_payroll(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    user_id: &str,
    tenant_id: &str,
    gross_pay: Decimal,
    ytd_gross: Decimal,
    today: NaiveDate,
) -> EngineResult<PayrollCalculation> {
    let mut errors = Vec::new();
    if gross_pay < Decimal::ZERO {
        errors.push(format!("Gross pay must not be negative (got {})", gross_pay));
    }
    if ytd_gross < Decimal::ZERO {
        errors.push(format!(
            "Year-to-date gross must not be negative (got {})",
            ytd_gross
        ));
    }
    if !errors.is_empty() {
        return Err(EngineError::ValidationFailed { errors });
    }

    let employment_type = match store.get_staff_member(user_id, tenant_id)? {
        Some(staff) => staff.employment_type,
        None => {
            warn!(
                user_id = %user_id,
                tenant_id = %tenant_id,
                "No staff profile; treating worker as casual"
            );
            EmploymentType::Casual
        }
    };
    let hourly_rate = get_user_hourly_rate(store, &config.payroll, user_id, tenant_id)?;

    let tax_year = tax_year_for(today);
    let brackets = load_tax_brackets(store, config, tax_year)?;

    let breakdown = calculate_payroll_breakdown(
        &PayrollInputs {
            gross_pay,
            ytd_gross,
            hourly_rate,
            employment_type,
            brackets: &brackets,
        },
        &config.payroll,
    );

    info!(
        user_id = %user_id,
        tenant_id = %tenant_id,
        tax_year,
        gross_pay = %breakdown.gross_pay,
        tax_withheld = %breakdown.tax_withheld,
        net_pay = %breakdown.net_pay,
        "Payroll calculated"
    );

    Ok(PayrollCalculation {
        user_id: user_id.to_string(),
        tenant_id: tenant_id.to_string(),
        tax_year,
        employment_type,
        hourly_rate,
        breakdown,
    })
}

/// Adds a pay run's accrued leave to the worker's balances.
///
/// Only leave types with a positive accrual are touched.
pub fn apply_leave_accrual(
    store: &dyn SettlementStore,
    user_id: &str,
    tenant_id: &str,
    accrual: &LeaveAccrual,
) -> EngineResult<Vec<LeaveBalance>> {
    let mut balances = Vec::new();
    for leave_type in LeaveType::ALL {
        let hours = accrual.hours(leave_type);
        if hours > Decimal::ZERO {
            balances.push(store.accrue_leave(user_id, tenant_id, leave_type, hours)?);
        }
    }
    Ok(balances)
}
