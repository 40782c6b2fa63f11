//! Threshold exporter
//!
//! # Architecture Overview
//!
//! ```text
//!   config.yaml ──stat every N s──▶ ConfigWatcher ──reload──▶ ConfigStore
//!                                                            (ArcSwap snapshot)
//!                                                                  │
//!   Prometheus ──GET /metrics──▶ HttpServer ──▶ ThresholdCollector ─┘
//!                                                 │
//!                                                 ▼
//!                                     resolve (pure, per scrape)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use threshold_exporter::config::{ConfigStore, ConfigWatcher, ExporterSettings};
use threshold_exporter::http::HttpServer;
use threshold_exporter::lifecycle::{join_task, wait_for_signal, Shutdown};
use threshold_exporter::observability::logging::{init_logging, LogFormat};
use threshold_exporter::observability::metrics::init_metrics;

#[derive(Parser)]
#[command(name = "threshold-exporter", version)]
#[command(about = "Expose per-tenant alert thresholds as Prometheus metrics", long_about = None)]
struct Args {
    /// Path to threshold config file
    #[arg(long, env = "CONFIG_PATH", default_value = "/etc/threshold-exporter/config.yaml")]
    config: PathBuf,

    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen: String,

    /// Config reload interval in seconds
    #[arg(long, env = "RELOAD_INTERVAL_SECS", default_value_t = 30)]
    reload_interval_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

impl From<Args> for ExporterSettings {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            listen_address: args.listen,
            reload_interval_secs: args.reload_interval_secs,
            request_timeout_secs: args.request_timeout_secs,
            log_format: args.log_format,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = ExporterSettings::from(Args::parse());
    init_logging(settings.log_format);
    settings.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %settings.config_path.display(),
        listen = %settings.listen_address,
        reload_interval_secs = settings.reload_interval_secs,
        "threshold-exporter starting"
    );

    let metrics_handle = match init_metrics() {
        Ok(handle) => Some(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics recorder");
            None
        }
    };

    // Without a first snapshot there is nothing to serve.
    let store = Arc::new(ConfigStore::new(settings.config_path.clone()));
    if let Err(e) = store.load() {
        tracing::error!(error = %e, "Failed to load config");
        return Err(e.into());
    }

    let shutdown = Shutdown::new();

    let watcher = ConfigWatcher::new(store.clone(), settings.reload_interval());
    let watcher_task = tokio::spawn(watcher.run(shutdown.subscribe()));

    let listener = TcpListener::bind(settings.listen_socket_addr()?).await?;
    let server = HttpServer::with_metrics_handle(store, settings.request_timeout(), metrics_handle);
    let server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    wait_for_signal().await;
    tracing::info!("Shutting down...");
    shutdown.trigger();

    join_task("config watcher", watcher_task).await;
    if let Some(Err(e)) = join_task("http server", server_task).await {
        tracing::error!(error = %e, "HTTP server failed");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
