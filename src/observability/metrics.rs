//! Operational metrics of the exporter itself.
//!
//! # Metrics
//! - `threshold_exporter_reloads_total` (counter): load attempts by outcome
//! - `threshold_exporter_config_loaded` (gauge): 1 once a config is published
//! - `threshold_exporter_last_reload_timestamp_seconds` (gauge)
//! - `threshold_exporter_{defaults,state_filters,tenants}` (gauge): sizes of
//!   the published config
//! - `threshold_exporter_resolved_{thresholds,state_filters}` (gauge)
//!
//! Recording goes through the `metrics` facade and is a no-op until
//! [`init_metrics`] installs the Prometheus recorder.

use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

use crate::resolve::ResolutionSummary;

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    ::metrics::describe_counter!(
        "threshold_exporter_reloads_total",
        "Config load attempts by outcome (success, read_error, parse_error)"
    );
    ::metrics::describe_gauge!(
        "threshold_exporter_config_loaded",
        "1 once a threshold config has been loaded successfully"
    );
    ::metrics::describe_gauge!(
        "threshold_exporter_last_reload_timestamp_seconds",
        "Unix time of the last successful config load"
    );
    ::metrics::gauge!("threshold_exporter_config_loaded").set(0.0);

    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}

/// Count a load attempt.
pub fn record_reload(outcome: &'static str) {
    ::metrics::counter!("threshold_exporter_reloads_total", "outcome" => outcome).increment(1);
}

/// Publish the shape of a freshly loaded config.
pub fn record_config_loaded(summary: &ResolutionSummary, loaded_at: DateTime<Utc>) {
    ::metrics::gauge!("threshold_exporter_config_loaded").set(1.0);
    ::metrics::gauge!("threshold_exporter_last_reload_timestamp_seconds")
        .set(loaded_at.timestamp_millis() as f64 / 1000.0);
    ::metrics::gauge!("threshold_exporter_defaults").set(summary.defaults as f64);
    ::metrics::gauge!("threshold_exporter_state_filters").set(summary.state_filters as f64);
    ::metrics::gauge!("threshold_exporter_tenants").set(summary.tenants as f64);
    ::metrics::gauge!("threshold_exporter_resolved_thresholds").set(summary.resolved_thresholds as f64);
    ::metrics::gauge!("threshold_exporter_resolved_state_filters").set(summary.resolved_state_filters as f64);
}
