//! Yearly wage increases across every tenant's pay scale.
//!
//! The whole request is validated before anything is written. Each tenant is
//! then updated in its own store transaction, so one tenant's failure is
//! reported in its [`TenantUpdateResult`] without touching the others.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};

use crate::calculation::{self, increased_rate, wage_increase_warnings};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{ActivityLogEntry, EmploymentType, PayScale, Tenant};
use crate::store::SettlementStore;

/// A requested across-the-board increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageIncreaseRequest {
    /// Date the new rates take effect.
    pub effective_date: NaiveDate,
    /// Increase in percent, e.g. `3.75`.
    pub increase_percentage: Decimal,
    /// Free-text reason recorded in the audit log.
    #[serde(default)]
    pub description: Option<String>,
    /// User applying the increase.
    pub applied_by: String,
}

/// Validation result for a proposed increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageIncreaseValidation {
    /// True when there are no errors.
    pub valid: bool,
    /// Problems that block the increase.
    pub errors: Vec<String>,
    /// Advisory notes that do not block it.
    pub warnings: Vec<String>,
}

/// One pay scale row before and after a proposed increase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePreview {
    /// Owning tenant.
    pub tenant_id: String,
    /// ScHADS classification level.
    pub level: u8,
    /// Pay point within the level.
    pub pay_point: u8,
    /// Employment type the rate applies to.
    pub employment_type: EmploymentType,
    /// Rate today.
    pub current_rate: Decimal,
    /// Rate after the increase.
    pub new_rate: Decimal,
    /// `new_rate - current_rate`.
    pub difference: Decimal,
}

/// A sample of the rates an increase would produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageIncreasePreview {
    /// Increase being previewed.
    pub increase_percentage: Decimal,
    /// Pay scale rows across all tenants.
    pub total_rates: usize,
    /// The first rows, at most the configured sample size.
    pub samples: Vec<RatePreview>,
}

/// Result of updating one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantUpdateResult {
    /// Tenant updated.
    pub tenant_id: String,
    /// Tenant display name.
    pub tenant_name: String,
    /// Rows changed; zero on failure.
    pub rates_updated: usize,
    /// Whether the tenant's transaction committed.
    pub success: bool,
    /// Failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a yearly increase across all tenants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageIncreaseOutcome {
    /// One entry per tenant, in tenant order.
    pub results: Vec<TenantUpdateResult>,
    /// Advisory notes from validation.
    pub warnings: Vec<String>,
}

impl WageIncreaseOutcome {
    /// Total rows updated across tenants.
    pub fn rates_updated(&self) -> usize {
        self.results.iter().map(|r| r.rates_updated).sum()
    }

    /// True when every tenant was updated.
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.success)
    }
}

/// Checks a proposed increase against policy.
pub fn validate_wage_increase(
    config: &EngineConfig,
    increase_percentage: Decimal,
    effective_date: NaiveDate,
    today: NaiveDate,
) -> WageIncreaseValidation {
    let errors = calculation::validate_wage_increase(
        increase_percentage,
        effective_date,
        today,
        &config.wage_increase,
    );
    let warnings = if errors.is_empty() {
        wage_increase_warnings(effective_date, today, &config.wage_increase)
    } else {
        Vec::new()
    };

    WageIncreaseValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Shows what an increase would do to a sample of pay scale rows.
///
/// Nothing is written.
pub fn preview_wage_increase(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    increase_percentage: Decimal,
) -> EngineResult<WageIncreasePreview> {
    let today = config.timesheet.local_now().date();
    // The date check cannot fail here; only the percentage is validated.
    let errors = calculation::validate_wage_increase(
        increase_percentage,
        today,
        today,
        &config.wage_increase,
    );
    if !errors.is_empty() {
        return Err(EngineError::ValidationFailed { errors });
    }

    let mut total_rates = 0;
    let mut samples = Vec::new();
    for tenant in store.list_tenants()? {
        let scales = store.list_pay_scales(&tenant.id)?;
        total_rates += scales.len();
        let room = config
            .wage_increase
            .preview_sample_size
            .saturating_sub(samples.len());
        samples.extend(
            scales
                .iter()
                .take(room)
                .map(|scale| preview_row(scale, increase_percentage)),
        );
    }

    Ok(WageIncreasePreview {
        increase_percentage,
        total_rates,
        samples,
    })
}

fn preview_row(scale: &PayScale, increase_percentage: Decimal) -> RatePreview {
    let new_rate = increased_rate(scale.hourly_rate, increase_percentage);
    RatePreview {
        tenant_id: scale.tenant_id.clone(),
        level: scale.level,
        pay_point: scale.pay_point,
        employment_type: scale.employment_type,
        current_rate: scale.hourly_rate,
        new_rate,
        difference: new_rate - scale.hourly_rate,
    }
}

/// Applies an increase to every pay scale row of every tenant.
///
/// Returns `ValidationFailed` before any write if the request breaks policy.
/// Otherwise each tenant is updated independently and reported in the
/// outcome.
pub fn apply_yearly_wage_increase(
    store: &dyn SettlementStore,
    config: &EngineConfig,
    request: &WageIncreaseRequest,
    today: NaiveDate,
) -> EngineResult<WageIncreaseOutcome> {
    let validation = validate_wage_increase(
        config,
        request.increase_percentage,
        request.effective_date,
        today,
    );
    if !validation.valid {
        warn!(
            percentage = %request.increase_percentage,
            effective_date = %request.effective_date,
            errors = ?validation.errors,
            "Wage increase rejected"
        );
        return Err(EngineError::ValidationFailed {
            errors: validation.errors,
        });
    }
    for warning in &validation.warnings {
        warn!(warning = %warning, "Wage increase warning");
    }

    let tenants = store.list_tenants()?;
    info!(
        percentage = %request.increase_percentage,
        effective_date = %request.effective_date,
        tenants = tenants.len(),
        "Applying yearly wage increase"
    );

    let results = tenants
        .into_iter()
        .map(|tenant| update_tenant(store, &tenant, request))
        .collect();

    let outcome = WageIncreaseOutcome {
        results,
        warnings: validation.warnings,
    };
    info!(
        rates_updated = outcome.rates_updated(),
        all_succeeded = outcome.all_succeeded(),
        "Yearly wage increase finished"
    );
    Ok(outcome)
}

fn update_tenant(
    store: &dyn SettlementStore,
    tenant: &Tenant,
    request: &WageIncreaseRequest,
) -> TenantUpdateResult {
    match apply_to_tenant(store, tenant, request) {
        Ok(rates_updated) => {
            info!(
                tenant_id = %tenant.id,
                rates_updated,
                "Tenant pay scales updated"
            );
            TenantUpdateResult {
                tenant_id: tenant.id.clone(),
                tenant_name: tenant.name.clone(),
                rates_updated,
                success: true,
                error: None,
            }
        }
        Err(err) => {
            error!(
                tenant_id = %tenant.id,
                error = %err,
                "Tenant pay scale update failed"
            );
            TenantUpdateResult {
                tenant_id: tenant.id.clone(),
                tenant_name: tenant.name.clone(),
                rates_updated: 0,
                success: false,
                error: Some(err.to_string()),
            }
        }
    }
}

fn apply_to_tenant(
    store: &dyn SettlementStore,
    tenant: &Tenant,
    request: &WageIncreaseRequest,
) -> EngineResult<usize> {
    let rates_updated = store.apply_pay_scale_increase(
        &tenant.id,
        request.increase_percentage,
        request.effective_date,
    )?;

    let entry = ActivityLogEntry {
        tenant_id: tenant.id.clone(),
        user_id: request.applied_by.clone(),
        action: "wage_increase".to_string(),
        entity_type: "pay_scale".to_string(),
        entity_id: tenant.id.clone(),
        description: request.description.clone().unwrap_or_else(|| {
            format!(
                "Applied {}% wage increase effective {}",
                request.increase_percentage.normalize(),
                request.effective_date
            )
        }),
        details: json!({
            "increase_percentage": request.increase_percentage,
            "effective_date": request.effective_date,
            "rates_updated": rates_updated,
        }),
        created_at: Utc::now(),
    };
    if let Err(err) = store.create_activity_log(entry) {
        warn!(
            tenant_id = %tenant.id,
            error = %err,
            "Failed to write wage increase audit record"
        );
    }

    Ok(rates_updated)
}
