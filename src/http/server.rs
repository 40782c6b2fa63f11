//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Bind server to listener
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::collector::ThresholdCollector;
use crate::config::ConfigStore;
use crate::http::handlers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub collector: ThresholdCollector,
    /// Renders the exporter's own metrics; absent when no recorder is installed.
    pub metrics_handle: Option<PrometheusHandle>,
}

/// HTTP server exposing metrics, health checks and the config view.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server reading from `store`.
    pub fn new(store: Arc<ConfigStore>, request_timeout: Duration) -> Self {
        Self::with_metrics_handle(store, request_timeout, None)
    }

    pub fn with_metrics_handle(
        store: Arc<ConfigStore>,
        request_timeout: Duration,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        let state = AppState {
            collector: ThresholdCollector::new(store.clone()),
            store,
            metrics_handle,
        };

        Self {
            router: Self::build_router(state, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState, request_timeout: Duration) -> Router {
        Router::new()
            .route("/metrics", get(handlers::metrics))
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            .route("/api/v1/config", get(handlers::config_view))
            .route("/api/v1/tenants/{tenant}", get(handlers::tenant_view))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// The router, for serving or for driving requests directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server received shutdown signal");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
