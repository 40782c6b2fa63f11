//! Threshold exporter library.
//!
//! Resolves per-tenant alert thresholds and state filters from a hot-reloaded
//! config file and exposes them as Prometheus gauges.

pub mod collector;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolve;

pub use collector::{MetricSink, ScrapeRegistry, ThresholdCollector};
pub use config::{ConfigStore, ConfigWatcher, ThresholdConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
