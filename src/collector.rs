//! Scrape-time collector.
//!
//! On every scrape the collector takes the current snapshot, resolves it, and
//! feeds the records to a [`MetricSink`]:
//!
//! - `user_threshold{tenant, metric, component, severity}` = threshold value
//! - `user_state_filter{tenant, filter, severity}` = 1 (absent = disabled)
//!
//! Each scrape resolves exactly one snapshot. [`ScrapeRegistry`] is the sink
//! the HTTP endpoint uses; it encodes with `prometheus::TextEncoder`.

use std::collections::HashMap;
use std::sync::Arc;

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::config::ConfigStore;
use crate::resolve::{resolve_state_filters, resolve_thresholds};

pub const THRESHOLD_METRIC: &str = "user_threshold";
pub const STATE_FILTER_METRIC: &str = "user_state_filter";

const THRESHOLD_LABELS: [&str; 4] = ["tenant", "metric", "component", "severity"];
const STATE_FILTER_LABELS: [&str; 3] = ["tenant", "filter", "severity"];

/// Receiver of labeled gauge observations.
pub trait MetricSink {
    type Error;

    /// Called once per metric family before its samples.
    fn describe(&mut self, name: &str, help: &str, label_names: &[&str]) -> Result<(), Self::Error>;

    fn gauge(&mut self, name: &str, labels: &[(&str, &str)], value: f64) -> Result<(), Self::Error>;
}

/// Resolves the published config into gauge samples.
#[derive(Clone)]
pub struct ThresholdCollector {
    store: Arc<ConfigStore>,
}

impl ThresholdCollector {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Emit every resolved threshold and enabled state filter.
    ///
    /// Nothing is emitted before the first successful load.
    pub fn collect<S: MetricSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        let Some(snapshot) = self.store.snapshot() else {
            return Ok(());
        };
        let config = &snapshot.config;

        sink.describe(
            THRESHOLD_METRIC,
            "User-defined alerting threshold (config-driven, three-state: custom/default/disable)",
            &THRESHOLD_LABELS,
        )?;
        for t in resolve_thresholds(config) {
            sink.gauge(
                THRESHOLD_METRIC,
                &[
                    ("tenant", t.tenant.as_str()),
                    ("metric", t.metric.as_str()),
                    ("component", t.component.as_str()),
                    ("severity", t.severity.as_str()),
                ],
                t.value,
            )?;
        }

        sink.describe(
            STATE_FILTER_METRIC,
            "State-based monitoring filter flag (1=enabled, absent=disabled)",
            &STATE_FILTER_LABELS,
        )?;
        for sf in resolve_state_filters(config) {
            sink.gauge(
                STATE_FILTER_METRIC,
                &[
                    ("tenant", sf.tenant.as_str()),
                    ("filter", sf.filter_name.as_str()),
                    ("severity", sf.severity.as_str()),
                ],
                1.0,
            )?;
        }

        Ok(())
    }
}

/// Sink backed by a throwaway `prometheus::Registry`.
///
/// One instance lives for one scrape, so series that disappear from the
/// resolution disappear from the output.
pub struct ScrapeRegistry {
    registry: Registry,
    families: HashMap<String, GaugeVec>,
}

impl ScrapeRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            families: HashMap::new(),
        }
    }

    /// Render the gathered families in the text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl Default for ScrapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSink for ScrapeRegistry {
    type Error = prometheus::Error;

    fn describe(&mut self, name: &str, help: &str, label_names: &[&str]) -> prometheus::Result<()> {
        let family = GaugeVec::new(Opts::new(name, help), label_names)?;
        self.registry.register(Box::new(family.clone()))?;
        self.families.insert(name.to_string(), family);
        Ok(())
    }

    fn gauge(&mut self, name: &str, labels: &[(&str, &str)], value: f64) -> prometheus::Result<()> {
        let family = self
            .families
            .get(name)
            .ok_or_else(|| prometheus::Error::Msg(format!("metric {name} was not described")))?;
        let labels: HashMap<&str, &str> = labels.iter().copied().collect();
        family.get_metric_with(&labels)?.set(value);
        Ok(())
    }
}
