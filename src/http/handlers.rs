//! Route handlers.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collector::ScrapeRegistry;
use crate::config::schema::{StateFilter, TenantOverrides};
use crate::http::server::AppState;
use crate::resolve::{resolve_state_filters, resolve_tenant, resolve_thresholds};
use crate::resolve::{ResolvedStateFilter, ResolvedThreshold};

/// Read-only view of the published config and what it resolves to.
#[derive(Debug, Serialize)]
pub struct ConfigView {
    pub loaded: bool,
    pub path: String,
    pub last_reload: Option<DateTime<Utc>>,
    pub file_modified: Option<DateTime<Utc>>,
    pub defaults: BTreeMap<String, f64>,
    pub state_filters: BTreeMap<String, StateFilter>,
    pub tenants: BTreeMap<String, TenantOverrides>,
    pub resolved_thresholds: Vec<ResolvedThreshold>,
    pub resolved_state_filters: Vec<ResolvedStateFilter>,
}

/// `GET /metrics`: resolved thresholds and filters, then the exporter's own
/// metrics.
pub async fn metrics(State(state): State<AppState>) -> Response {
    let mut registry = ScrapeRegistry::new();
    let encoded = state
        .collector
        .collect(&mut registry)
        .and_then(|()| registry.encode());

    let mut body = match encoded {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode threshold metrics");
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("encode metrics: {e}\n")).into_response();
        }
    };
    if let Some(handle) = &state.metrics_handle {
        body.push_str(&handle.render());
    }

    ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response()
}

/// `GET /health`: the process is up.
pub async fn health() -> &'static str {
    "ok\n"
}

/// `GET /ready`: a config has been loaded at least once.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.store.is_ready() {
        (StatusCode::OK, "ready\n")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "config not loaded\n")
    }
}

/// `GET /api/v1/config`
pub async fn config_view(State(state): State<AppState>) -> Json<ConfigView> {
    let path = state.store.path().display().to_string();

    let view = match state.store.snapshot() {
        Some(snapshot) => {
            let config = &snapshot.config;
            ConfigView {
                loaded: true,
                path,
                last_reload: Some(snapshot.loaded_at),
                file_modified: snapshot.modified.map(DateTime::<Utc>::from),
                defaults: config.defaults.clone(),
                state_filters: config.state_filters.clone(),
                tenants: config.tenants.clone(),
                resolved_thresholds: resolve_thresholds(config),
                resolved_state_filters: resolve_state_filters(config),
            }
        }
        None => ConfigView {
            loaded: false,
            path,
            last_reload: None,
            file_modified: None,
            defaults: BTreeMap::new(),
            state_filters: BTreeMap::new(),
            tenants: BTreeMap::new(),
            resolved_thresholds: Vec::new(),
            resolved_state_filters: Vec::new(),
        },
    };

    Json(view)
}

/// `GET /api/v1/tenants/{tenant}`
pub async fn tenant_view(State(state): State<AppState>, Path(tenant): Path<String>) -> Response {
    let config = state.store.current();

    match resolve_tenant(&config, &tenant) {
        Some(resolution) => Json(resolution).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("unknown tenant {tenant:?}") })),
        )
            .into_response(),
    }
}
