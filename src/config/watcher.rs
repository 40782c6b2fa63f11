//! Configuration file watcher for hot reload.
//!
//! Polls the file's modification time on a fixed interval and reloads the
//! store when it has advanced. `metadata` follows symlinks, so a ConfigMap
//! mount that swaps its `..data` link is picked up like an in-place write.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::{self, MissedTickBehavior};

use crate::config::store::ConfigStore;

/// Result of a single watch tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchTick {
    /// The file has not changed since the published snapshot.
    Unchanged,
    /// The file changed and the new snapshot is published.
    Reloaded,
    /// The file changed but could not be loaded; the old snapshot stays.
    ReloadFailed,
    /// The file could not be stat'ed.
    StatFailed,
}

/// Periodically re-checks the config file and reloads the store.
pub struct ConfigWatcher {
    store: Arc<ConfigStore>,
    interval: Duration,
}

impl ConfigWatcher {
    pub fn new(store: Arc<ConfigStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run until a shutdown signal arrives.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            path = %self.store.path().display(),
            interval = ?self.interval,
            "Config watcher started"
        );

        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; startup has just loaded the file.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Config watcher received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// Stat the file and reload it if its modification time advanced.
    pub async fn check(&self) -> WatchTick {
        let path = self.store.path();

        let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot stat config file");
                return WatchTick::StatFailed;
            }
        };

        if !self.store.needs_reload(modified) {
            return WatchTick::Unchanged;
        }

        tracing::info!(path = %path.display(), "Config file change detected, reloading...");

        let store = self.store.clone();
        match tokio::task::spawn_blocking(move || store.load()).await {
            Ok(Ok(_)) => WatchTick::Reloaded,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Failed to reload config. Keeping current configuration.");
                WatchTick::ReloadFailed
            }
            Err(e) => {
                tracing::error!(error = %e, "Config reload task failed. Keeping current configuration.");
                WatchTick::ReloadFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::SystemTime;

    fn touch(path: &Path, modified: SystemTime) {
        fs::File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[tokio::test]
    async fn test_check_reloads_on_newer_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "defaults:\n  mysql_cpu: 80\n").unwrap();

        let store = Arc::new(ConfigStore::new(&path));
        store.load().unwrap();
        let watcher = ConfigWatcher::new(store.clone(), Duration::from_secs(30));

        assert_eq!(watcher.check().await, WatchTick::Unchanged);

        fs::write(&path, "defaults:\n  mysql_cpu: 95\n").unwrap();
        touch(&path, SystemTime::now() + Duration::from_secs(60));

        assert_eq!(watcher.check().await, WatchTick::Reloaded);
        assert_eq!(store.current().defaults["mysql_cpu"], 95.0);
        assert_eq!(watcher.check().await, WatchTick::Unchanged);
    }

    #[tokio::test]
    async fn test_check_keeps_snapshot_on_bad_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "defaults:\n  mysql_cpu: 80\n").unwrap();

        let store = Arc::new(ConfigStore::new(&path));
        store.load().unwrap();
        let watcher = ConfigWatcher::new(store.clone(), Duration::from_secs(30));

        fs::write(&path, "defaults: {mysql_cpu: ").unwrap();
        touch(&path, SystemTime::now() + Duration::from_secs(60));

        assert_eq!(watcher.check().await, WatchTick::ReloadFailed);
        assert_eq!(store.current().defaults["mysql_cpu"], 80.0);
        // Still newer than the published snapshot, so the next tick retries.
        assert_eq!(watcher.check().await, WatchTick::ReloadFailed);
    }

    #[tokio::test]
    async fn test_check_survives_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ConfigStore::new(dir.path().join("gone.yaml")));
        let watcher = ConfigWatcher::new(store.clone(), Duration::from_secs(30));

        assert_eq!(watcher.check().await, WatchTick::StatFailed);
        assert!(!store.is_ready());
    }

    #[tokio::test]
    async fn test_run_exits_on_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ConfigStore::new(dir.path().join("config.yaml")));
        let watcher = ConfigWatcher::new(store, Duration::from_millis(10));

        let (tx, rx) = broadcast::channel(1);
        let handle = tokio::spawn(watcher.run(rx));

        time::sleep(Duration::from_millis(50)).await;
        tx.send(()).unwrap();

        time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("watcher did not stop")
            .unwrap();
    }
}
