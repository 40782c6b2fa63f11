//! Configuration validation.
//!
//! # Responsibilities
//! - Report overrides that can never take effect
//! - Report reserved-prefix keys placed in `defaults`
//! - Report default keys that resolve to the same series
//!
//! # Design Decisions
//! - Returns all findings, not just the first
//! - Findings are warnings: a config that parses is always accepted
//! - Pure function: ThresholdConfig → Vec<ValidationWarning>

use std::collections::BTreeMap;
use std::fmt;

use crate::config::schema::{ThresholdConfig, STATE_FILTER_PREFIX};
use crate::resolve::split_metric_key;

/// A semantic problem that does not prevent the config from being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// `defaults` contains a key with the state filter prefix; it is ignored.
    ReservedDefaultKey { key: String },
    /// Two default keys split into the same (component, metric) labels.
    CollidingMetricKey { key: String, other: String },
    /// A tenant overrides a metric key that has no default.
    UnknownMetricOverride { tenant: String, key: String },
    /// A tenant disables a state filter that is not defined.
    UnknownStateFilter { tenant: String, filter: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::ReservedDefaultKey { key } => {
                write!(f, "default key {key:?} uses reserved prefix {STATE_FILTER_PREFIX:?} and is ignored")
            }
            ValidationWarning::CollidingMetricKey { key, other } => {
                let (component, metric) = split_metric_key(key);
                write!(
                    f,
                    "default keys {other:?} and {key:?} both resolve to component {component:?} metric {metric:?}"
                )
            }
            ValidationWarning::UnknownMetricOverride { tenant, key } => {
                write!(f, "tenant {tenant:?} overrides {key:?} which has no default")
            }
            ValidationWarning::UnknownStateFilter { tenant, filter } => {
                write!(f, "tenant {tenant:?} references undefined state filter {filter:?}")
            }
        }
    }
}

pub fn validate_config(config: &ThresholdConfig) -> Vec<ValidationWarning> {
    let mut warnings: Vec<ValidationWarning> = config
        .defaults
        .keys()
        .filter(|key| key.starts_with(STATE_FILTER_PREFIX))
        .map(|key| ValidationWarning::ReservedDefaultKey { key: key.clone() })
        .collect();

    let mut series: BTreeMap<(&str, &str), &String> = BTreeMap::new();
    for key in config.defaults.keys().filter(|key| !key.starts_with(STATE_FILTER_PREFIX)) {
        if let Some(other) = series.insert(split_metric_key(key), key) {
            warnings.push(ValidationWarning::CollidingMetricKey {
                key: key.clone(),
                other: other.clone(),
            });
        }
    }

    for (tenant, overrides) in &config.tenants {
        for key in overrides.keys() {
            match key.strip_prefix(STATE_FILTER_PREFIX) {
                Some(filter) if !config.state_filters.contains_key(filter) => {
                    warnings.push(ValidationWarning::UnknownStateFilter {
                        tenant: tenant.clone(),
                        filter: filter.to_string(),
                    });
                }
                Some(_) => {}
                None if !config.defaults.contains_key(key) => {
                    warnings.push(ValidationWarning::UnknownMetricOverride {
                        tenant: tenant.clone(),
                        key: key.clone(),
                    });
                }
                None => {}
            }
        }
    }

    warnings
}
