//! State filter resolution.
//!
//! Every filter is enabled for every tenant unless the tenant disables it with
//! `_state_<filter>: disable`. Disabled pairs are simply absent.

use serde::Serialize;

use crate::config::schema::{ThresholdConfig, TenantOverrides, STATE_FILTER_PREFIX};
use crate::resolve::overrides::is_disable_token;

/// An enabled state filter for one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStateFilter {
    pub tenant: String,
    pub filter_name: String,
    pub severity: String,
}

/// Override key that disables `filter_name` for a tenant.
pub fn disable_key(filter_name: &str) -> String {
    format!("{STATE_FILTER_PREFIX}{filter_name}")
}

pub fn resolve_state_filters(config: &ThresholdConfig) -> Vec<ResolvedStateFilter> {
    let mut result = Vec::with_capacity(config.state_filters.len() * config.tenants.len());

    for (filter_name, filter) in &config.state_filters {
        let severity = filter.effective_severity();
        let key = disable_key(filter_name);

        for (tenant, overrides) in &config.tenants {
            if is_disabled(overrides, &key) {
                continue;
            }
            result.push(ResolvedStateFilter {
                tenant: tenant.clone(),
                filter_name: filter_name.clone(),
                severity: severity.to_string(),
            });
        }
    }

    result
}

pub(crate) fn resolve_tenant_state_filters(
    config: &ThresholdConfig,
    tenant: &str,
    overrides: &TenantOverrides,
) -> Vec<ResolvedStateFilter> {
    config
        .state_filters
        .iter()
        .filter(|(name, _)| !is_disabled(overrides, &disable_key(name)))
        .map(|(name, filter)| ResolvedStateFilter {
            tenant: tenant.to_string(),
            filter_name: name.clone(),
            severity: filter.effective_severity().to_string(),
        })
        .collect()
}

fn is_disabled(overrides: &TenantOverrides, key: &str) -> bool {
    overrides.get(key).is_some_and(|raw| is_disable_token(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StateFilter;

    fn filter(severity: &str) -> StateFilter {
        StateFilter {
            reasons: vec!["CrashLoopBackOff".into()],
            severity: severity.into(),
        }
    }

    fn base_config() -> ThresholdConfig {
        let mut cfg = ThresholdConfig::default();
        cfg.state_filters.insert("container_crashloop".into(), filter("critical"));
        cfg.tenants.insert("db-a".into(), TenantOverrides::new());
        cfg.tenants.insert("db-b".into(), TenantOverrides::new());
        cfg
    }

    #[test]
    fn test_enabled_for_every_tenant_by_default() {
        let resolved = resolve_state_filters(&base_config());

        assert_eq!(resolved.len(), 2);
        assert!(resolved
            .iter()
            .all(|r| r.filter_name == "container_crashloop" && r.severity == "critical"));
    }

    #[test]
    fn test_tenant_disable_omits_only_that_tenant() {
        let mut cfg = base_config();
        cfg.tenants
            .get_mut("db-b")
            .unwrap()
            .insert("_state_container_crashloop".into(), " Disable ".into());

        assert_eq!(
            resolve_state_filters(&cfg),
            vec![ResolvedStateFilter {
                tenant: "db-a".into(),
                filter_name: "container_crashloop".into(),
                severity: "critical".into(),
            }]
        );
    }

    #[test]
    fn test_non_disable_value_keeps_filter_enabled() {
        let mut cfg = base_config();
        cfg.tenants
            .get_mut("db-a")
            .unwrap()
            .insert("_state_container_crashloop".into(), "enable".into());

        assert_eq!(resolve_state_filters(&cfg).len(), 2);
    }

    #[test]
    fn test_empty_severity_defaults_to_warning() {
        let mut cfg = base_config();
        cfg.state_filters.insert("container_imagepull".into(), filter(""));

        let imagepull: Vec<_> = resolve_state_filters(&cfg)
            .into_iter()
            .filter(|r| r.filter_name == "container_imagepull")
            .collect();
        assert_eq!(imagepull.len(), 2);
        assert!(imagepull.iter().all(|r| r.severity == "warning"));
    }

    #[test]
    fn test_no_filters_no_records() {
        let mut cfg = base_config();
        cfg.state_filters.clear();
        assert!(resolve_state_filters(&cfg).is_empty());
    }

    #[test]
    fn test_no_tenants_no_records() {
        let mut cfg = base_config();
        cfg.tenants.clear();
        assert!(resolve_state_filters(&cfg).is_empty());
    }
}
