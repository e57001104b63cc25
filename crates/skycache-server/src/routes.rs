//! # Web API Routes
//!
//! Route definitions for the `/api` surface.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Weather lookups
pub fn weather_routes() -> Router<Arc<AppState>> {
    Router::new().route("/weather/{location}", get(handlers::weather::get_weather))
}

/// Cache introspection.
///
/// `/cache/stats` is a static segment and takes precedence over
/// `/cache/{key}`, so a key named `stats` cannot be fetched individually.
pub fn cache_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/cache", get(handlers::cache::list_keys))
        .route("/cache/stats", get(handlers::cache::cache_stats))
        .route("/cache/{key}", get(handlers::cache::get_key))
}

/// Liveness / readiness
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}
