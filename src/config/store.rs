//! Published configuration snapshot.
//!
//! # Responsibilities
//! - Load the threshold file and publish it as one immutable snapshot
//! - Serve the current snapshot to any number of concurrent readers
//! - Track readiness and load metadata
//!
//! # Design Decisions
//! - The snapshot lives in an `ArcSwap`; readers never take a lock
//! - Parsing happens before the swap, so a slow parse never delays a scrape
//! - Reloads are serialized so an older parse can never overwrite a newer one
//! - A failed reload leaves the previous snapshot in place

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::ThresholdConfig;
use crate::config::validation::validate_config;
use crate::observability::metrics;
use crate::resolve::ResolutionSummary;

/// A fully loaded configuration plus where and when it came from.
#[derive(Debug)]
pub struct ConfigSnapshot {
    pub config: Arc<ThresholdConfig>,
    /// When the snapshot was published.
    pub loaded_at: DateTime<Utc>,
    /// File modification time observed just before reading it.
    pub modified: Option<SystemTime>,
}

/// Owner of the current configuration snapshot.
pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwapOption<ConfigSnapshot>,
    empty: Arc<ThresholdConfig>,
    reload_lock: Mutex<()>,
}

impl ConfigStore {
    /// Create an uninitialized store for the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: ArcSwapOption::empty(),
            empty: Arc::new(ThresholdConfig::default()),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and publish the config file.
    ///
    /// On error the previously published snapshot (if any) stays current.
    pub fn load(&self) -> Result<Arc<ConfigSnapshot>, ConfigError> {
        let _guard = self.reload_lock.lock().unwrap_or_else(|e| e.into_inner());

        // Stat before reading: a write racing the read shows up as a newer
        // mtime on the next watch tick.
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();

        let config = match load_config(&self.path) {
            Ok(config) => config,
            Err(e) => {
                metrics::record_reload(match e {
                    ConfigError::Read { .. } => "read_error",
                    ConfigError::Parse { .. } => "parse_error",
                });
                return Err(e);
            }
        };

        for warning in validate_config(&config) {
            tracing::warn!(path = %self.path.display(), "Config validation: {}", warning);
        }

        let summary = ResolutionSummary::of(&config);
        let snapshot = Arc::new(ConfigSnapshot {
            config: Arc::new(config),
            loaded_at: Utc::now(),
            modified,
        });

        self.current.store(Some(snapshot.clone()));

        metrics::record_reload("success");
        metrics::record_config_loaded(&summary, snapshot.loaded_at);
        tracing::info!(
            path = %self.path.display(),
            defaults = summary.defaults,
            state_filters = summary.state_filters,
            tenants = summary.tenants,
            resolved_thresholds = summary.resolved_thresholds,
            resolved_state_filters = summary.resolved_state_filters,
            "Config loaded"
        );

        Ok(snapshot)
    }

    /// The published config, or an empty config before the first load.
    pub fn current(&self) -> Arc<ThresholdConfig> {
        match self.current.load_full() {
            Some(snapshot) => snapshot.config.clone(),
            None => self.empty.clone(),
        }
    }

    /// The published snapshot with its metadata, if any load has succeeded.
    pub fn snapshot(&self) -> Option<Arc<ConfigSnapshot>> {
        self.current.load_full()
    }

    /// True once at least one load has succeeded.
    pub fn is_ready(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn last_reload(&self) -> Option<DateTime<Utc>> {
        self.current.load_full().map(|s| s.loaded_at)
    }

    /// Whether a file with modification time `modified` is newer than what
    /// is currently published.
    pub fn needs_reload(&self, modified: SystemTime) -> bool {
        match self.current.load_full().and_then(|s| s.modified) {
            Some(published) => modified > published,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("config.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_uninitialized_store() {
        let store = ConfigStore::new("/nonexistent/config.yaml");

        assert!(!store.is_ready());
        assert!(store.snapshot().is_none());
        assert!(store.last_reload().is_none());
        assert!(store.current().is_empty());
        assert!(store.needs_reload(SystemTime::UNIX_EPOCH));
    }

    #[test]
    fn test_load_publishes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "defaults:\n  mysql_cpu: 80\ntenants:\n  db-a: {}\n");
        let store = ConfigStore::new(&path);

        let snapshot = store.load().unwrap();

        assert!(store.is_ready());
        assert_eq!(store.current().defaults["mysql_cpu"], 80.0);
        assert_eq!(store.last_reload(), Some(snapshot.loaded_at));
        assert!(snapshot.modified.is_some());
        assert!(Arc::ptr_eq(&store.current(), &snapshot.config));
    }

    #[test]
    fn test_failed_reload_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "defaults:\n  mysql_cpu: 80\n");
        let store = ConfigStore::new(&path);
        let first = store.load().unwrap();

        fs::write(&path, "defaults: [unterminated").unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Parse { .. })));

        fs::remove_file(&path).unwrap();
        assert!(matches!(store.load(), Err(ConfigError::Read { .. })));

        assert!(store.is_ready());
        assert!(Arc::ptr_eq(&store.current(), &first.config));
    }

    #[test]
    fn test_first_load_failure_stays_uninitialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("missing.yaml"));

        assert!(store.load().is_err());
        assert!(!store.is_ready());
        assert!(store.current().is_empty());
    }

    #[test]
    fn test_needs_reload_compares_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "defaults: {}\n");
        let store = ConfigStore::new(&path);
        let published = store.load().unwrap().modified.unwrap();

        assert!(!store.needs_reload(published));
        assert!(!store.needs_reload(published - Duration::from_secs(5)));
        assert!(store.needs_reload(published + Duration::from_secs(5)));
    }
}
