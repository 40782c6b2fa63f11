//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! threshold file (YAML/JSON)
//!     → loader.rs (read, parse & normalize)
//!     → validation.rs (semantic warnings)
//!     → ThresholdConfig (immutable)
//!     → store.rs (atomic swap of Arc<ConfigSnapshot>)
//!     → readers (collector, config view)
//!
//! Every reload interval:
//!     watcher.rs stats the file
//!     → mtime advanced? store.rs reloads
//!     → failure keeps the previous snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Missing sections normalize to empty maps
//! - Only unreadable or unparsable files are errors; semantic problems warn

pub mod loader;
pub mod schema;
pub mod settings;
pub mod store;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{StateFilter, ThresholdConfig};
pub use settings::ExporterSettings;
pub use store::{ConfigSnapshot, ConfigStore};
pub use watcher::ConfigWatcher;
