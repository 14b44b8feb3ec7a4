//! Cloud Solver — HTTP API.
//!
//! Exposes scoring, progression, hints and game content over JSON. The
//! binary in `main.rs` wires configuration, telemetry and storage; everything
//! else lives here so tests can drive the router directly.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full router with HTTP tracing and CORS layers.
pub fn build_app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
