//! Configuration schema definitions.
//!
//! This module defines the threshold file structure. `ThresholdFile` mirrors
//! the document as written (every section optional); `ThresholdConfig` is the
//! normalized form the rest of the crate works with.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Override key prefix that addresses a state filter instead of a metric.
pub const STATE_FILTER_PREFIX: &str = "_state_";

/// Severity used when neither the override nor the filter names one.
pub const DEFAULT_SEVERITY: &str = "warning";

/// Overrides for a single tenant, keyed by metric key or `_state_<filter>`.
pub type TenantOverrides = BTreeMap<String, String>;

/// Normalized threshold configuration.
///
/// Example file:
///
/// ```yaml
/// defaults:
///   mysql_connections: 80
///   mysql_cpu: 80
/// state_filters:
///   container_crashloop:
///     reasons: ["CrashLoopBackOff"]
///     severity: "critical"
/// tenants:
///   db-a:
///     mysql_connections: "70"
///   db-b:
///     mysql_connections: "disable"
///     _state_container_crashloop: "disable"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ThresholdConfig {
    /// Default value per metric key (`<component>_<metric>`).
    pub defaults: BTreeMap<String, f64>,

    /// State filter definitions by name.
    pub state_filters: BTreeMap<String, StateFilter>,

    /// Raw per-tenant overrides.
    pub tenants: BTreeMap<String, TenantOverrides>,
}

impl ThresholdConfig {
    /// True when the config carries nothing to resolve.
    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty() && self.state_filters.is_empty() && self.tenants.is_empty()
    }
}

/// A named state-based monitoring toggle.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StateFilter {
    /// Container waiting/terminated reasons the filter matches.
    pub reasons: Vec<String>,

    /// Alert severity; empty means `warning`.
    pub severity: String,
}

impl StateFilter {
    pub fn effective_severity(&self) -> &str {
        let severity = self.severity.trim();
        if severity.is_empty() {
            DEFAULT_SEVERITY
        } else {
            severity
        }
    }
}

/// The document as it appears on disk.
///
/// Sections may be missing or explicitly null; `normalize` turns both into
/// empty maps.
#[derive(Debug, Default, Deserialize)]
pub struct ThresholdFile {
    #[serde(default)]
    pub defaults: Option<BTreeMap<String, f64>>,

    #[serde(default)]
    pub state_filters: Option<BTreeMap<String, StateFilter>>,

    #[serde(default, deserialize_with = "deserialize_tenants")]
    pub tenants: Option<BTreeMap<String, TenantOverrides>>,
}

impl ThresholdFile {
    pub fn normalize(self) -> ThresholdConfig {
        ThresholdConfig {
            defaults: self.defaults.unwrap_or_default(),
            state_filters: self.state_filters.unwrap_or_default(),
            tenants: self.tenants.unwrap_or_default(),
        }
    }
}

/// Scalar forms accepted for an override value.
///
/// Authors often leave numbers and booleans unquoted; they are kept as their
/// textual form so resolution sees one grammar. A null value (`key:` or
/// `key: ~`) becomes the empty string, which resolves as unrecognized.
#[derive(Deserialize)]
#[serde(untagged)]
enum OverrideScalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl From<OverrideScalar> for String {
    fn from(value: OverrideScalar) -> Self {
        match value {
            OverrideScalar::Text(s) => s,
            OverrideScalar::Integer(i) => i.to_string(),
            OverrideScalar::Float(f) => f.to_string(),
            OverrideScalar::Flag(b) => b.to_string(),
        }
    }
}

fn deserialize_tenants<'de, D>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, TenantOverrides>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<BTreeMap<String, Option<OverrideScalar>>>>> =
        Option::deserialize(deserializer)?;

    Ok(raw.map(|tenants| {
        tenants
            .into_iter()
            .map(|(tenant, overrides)| {
                let overrides = overrides
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(key, value)| (key, value.map(String::from).unwrap_or_default()))
                    .collect();
                (tenant, overrides)
            })
            .collect()
    }))
}
