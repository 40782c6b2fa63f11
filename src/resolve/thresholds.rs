//! Numeric threshold resolution.

use serde::Serialize;

use crate::config::schema::{ThresholdConfig, TenantOverrides, DEFAULT_SEVERITY, STATE_FILTER_PREFIX};
use crate::resolve::overrides::OverrideValue;

/// Resolved threshold for one tenant and metric key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedThreshold {
    pub tenant: String,
    pub component: String,
    pub metric: String,
    pub value: f64,
    pub severity: String,
}

/// Split `mysql_connections` into (`mysql`, `connections`).
///
/// Keys without a separator belong to the `default` component.
pub fn split_metric_key(key: &str) -> (&str, &str) {
    key.split_once('_').unwrap_or(("default", key))
}

/// Resolve every (tenant, default key) pair.
///
/// Disabled overrides produce no record. Unrecognized overrides log a warning
/// and fall back to the default value and severity.
pub fn resolve_thresholds(config: &ThresholdConfig) -> Vec<ResolvedThreshold> {
    let mut result = Vec::with_capacity(config.tenants.len() * config.defaults.len());

    for (tenant, overrides) in &config.tenants {
        resolve_into(config, tenant, overrides, &mut result);
    }

    result
}

/// Resolve thresholds for a single tenant.
pub(crate) fn resolve_tenant_thresholds(
    config: &ThresholdConfig,
    tenant: &str,
    overrides: &TenantOverrides,
) -> Vec<ResolvedThreshold> {
    let mut result = Vec::with_capacity(config.defaults.len());
    resolve_into(config, tenant, overrides, &mut result);
    result
}

fn resolve_into(
    config: &ThresholdConfig,
    tenant: &str,
    overrides: &TenantOverrides,
    out: &mut Vec<ResolvedThreshold>,
) {
    for (metric_key, &default_value) in &config.defaults {
        if metric_key.starts_with(STATE_FILTER_PREFIX) {
            continue;
        }

        let (component, metric) = split_metric_key(metric_key);
        let mut value = default_value;
        let mut severity = DEFAULT_SEVERITY.to_string();

        if let Some(raw) = overrides.get(metric_key) {
            match OverrideValue::parse(raw) {
                OverrideValue::Disabled => continue,
                OverrideValue::Custom { value: custom, severity: custom_severity } => {
                    value = custom;
                    if let Some(custom_severity) = custom_severity {
                        severity = custom_severity;
                    }
                }
                OverrideValue::Unrecognized(raw_value) => {
                    tracing::warn!(
                        tenant = %tenant,
                        metric_key = %metric_key,
                        raw_value = %raw_value,
                        default = default_value,
                        "Unrecognized override value, using default"
                    );
                }
            }
        }

        out.push(ResolvedThreshold {
            tenant: tenant.to_string(),
            component: component.to_string(),
            metric: metric.to_string(),
            value,
            severity,
        });
    }
}
