//! Resolution engine.
//!
//! # Data Flow
//! ```text
//! ThresholdConfig (immutable snapshot)
//!     → overrides.rs (raw string → OverrideValue)
//!     → thresholds.rs (defaults × tenants → ResolvedThreshold)
//!     → state_filters.rs (filters × tenants → ResolvedStateFilter)
//!     → collector (one pass per scrape)
//! ```
//!
//! Everything here is a pure function of the config. The only side effect is
//! a `tracing` warning for override values that cannot be interpreted.

pub mod overrides;
pub mod state_filters;
pub mod thresholds;

use serde::Serialize;

use crate::config::schema::ThresholdConfig;

pub use overrides::{is_disable_token, OverrideValue, DISABLE_TOKENS};
pub use state_filters::{resolve_state_filters, ResolvedStateFilter};
pub use thresholds::{resolve_thresholds, split_metric_key, ResolvedThreshold};

/// Everything resolved for a single tenant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenantResolution {
    pub tenant: String,
    pub thresholds: Vec<ResolvedThreshold>,
    pub state_filters: Vec<ResolvedStateFilter>,
}

/// Resolve one tenant, or `None` if the config does not know it.
pub fn resolve_tenant(config: &ThresholdConfig, tenant: &str) -> Option<TenantResolution> {
    let overrides = config.tenants.get(tenant)?;

    Some(TenantResolution {
        tenant: tenant.to_string(),
        thresholds: thresholds::resolve_tenant_thresholds(config, tenant, overrides),
        state_filters: state_filters::resolve_tenant_state_filters(config, tenant, overrides),
    })
}

/// Counts reported after each load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionSummary {
    pub defaults: usize,
    pub state_filters: usize,
    pub tenants: usize,
    pub resolved_thresholds: usize,
    pub resolved_state_filters: usize,
}

impl ResolutionSummary {
    pub fn of(config: &ThresholdConfig) -> Self {
        Self {
            defaults: config.defaults.len(),
            state_filters: config.state_filters.len(),
            tenants: config.tenants.len(),
            resolved_thresholds: resolve_thresholds(config).len(),
            resolved_state_filters: resolve_state_filters(config).len(),
        }
    }
}
