//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (reload counters, config size gauges)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → /metrics, appended after the resolved thresholds
//! ```

pub mod logging;
pub mod metrics;
