//! HTTP surface of the exporter.
//!
//! # Routes
//! ```text
//! GET /metrics                  → collector (resolve snapshot) + own metrics
//! GET /health                   → liveness
//! GET /ready                    → 200 once a config has loaded, else 503
//! GET /api/v1/config            → published config and its resolution (JSON)
//! GET /api/v1/tenants/{tenant}  → one tenant's resolution (JSON)
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
