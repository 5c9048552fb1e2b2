//! Hourly rate lookup for support workers.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::PayrollConfig;
use crate::error::EngineResult;
use crate::models::PayScaleKey;
use crate::store::SettlementStore;

/// The worker's hourly rate from their tenant's pay scale.
///
/// Falls back to the statutory minimum when the worker has no profile, no
/// classification, or no positive matching pay scale row.
pub fn get_user_hourly_rate(
    store: &dyn SettlementStore,
    config: &PayrollConfig,
    user_id: &str,
    tenant_id: &str,
) -> EngineResult<Decimal> {
    let fallback = config.statutory_minimum_hourly_rate;

    let Some(staff) = store.get_staff_member(user_id, tenant_id)? else {
        warn!(
            user_id = %user_id,
            tenant_id = %tenant_id,
            rate = %fallback,
            "No staff profile; using statutory minimum rate"
        );
        return Ok(fallback);
    };

    let (Some(level), Some(pay_point)) = (staff.level, staff.pay_point) else {
        debug!(
            user_id = %user_id,
            tenant_id = %tenant_id,
            rate = %fallback,
            "Staff member has no classification; using statutory minimum rate"
        );
        return Ok(fallback);
    };

    let key = PayScaleKey {
        level,
        pay_point,
        employment_type: staff.employment_type,
    };

    match store.get_pay_scale(tenant_id, key)? {
        Some(scale) if scale.hourly_rate > Decimal::ZERO => Ok(scale.hourly_rate),
        _ => {
            warn!(
                user_id = %user_id,
                tenant_id = %tenant_id,
                level,
                pay_point,
                employment_type = %staff.employment_type,
                rate = %fallback,
                "No pay scale row matches; using statutory minimum rate"
            );
            Ok(fallback)
        }
    }
}
