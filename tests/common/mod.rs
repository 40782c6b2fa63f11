//! Shared utilities for integration tests.

use std::fs;
use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use threshold_exporter::config::{ConfigStore, ConfigWatcher};
use threshold_exporter::http::HttpServer;
use threshold_exporter::lifecycle::Shutdown;

/// Replace `path` with `content` in one rename, so a concurrent reader sees
/// either the old or the new file, and push its mtime `offset_secs` ahead.
#[allow(dead_code)]
pub fn replace_config(path: &Path, content: &str, offset_secs: u64) {
    let dir = path.parent().unwrap();
    let mut tmp = tempfile::NamedTempFile::new_in(dir).unwrap();
    tmp.write_all(content.as_bytes()).unwrap();
    tmp.as_file()
        .set_modified(SystemTime::now() + Duration::from_secs(offset_secs))
        .unwrap();
    tmp.persist(path).unwrap();
}

/// Write an initial config and return a store that has loaded it.
pub fn loaded_store(dir: &Path, content: &str) -> Arc<ConfigStore> {
    let path = dir.join("config.yaml");
    fs::write(&path, content).unwrap();
    let store = Arc::new(ConfigStore::new(path));
    store.load().unwrap();
    store
}

/// Start the HTTP server and the watcher on an ephemeral port.
#[allow(dead_code)]
pub async fn start_exporter(store: Arc<ConfigStore>, reload_interval: Duration) -> (SocketAddr, Shutdown) {
    let shutdown = Shutdown::new();

    let watcher = ConfigWatcher::new(store.clone(), reload_interval);
    tokio::spawn(watcher.run(shutdown.subscribe()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(store, Duration::from_secs(5));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
