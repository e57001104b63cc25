//! # Health Check Handler
//!
//! Reports service status together with cache reachability.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use crate::response_types::HealthResponse;
use crate::state::{AppState, SERVICE_VERSION};

/// Health check endpoint: GET /api/health
///
/// Sends a PING to the cache and nothing else. 200 with `healthy` when it
/// answers, 503 with `degraded` when it does not.
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    tracing::debug!("Health check request received");

    let (status_code, status, cache) = match state.cache.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected"),
        Err(e) => {
            tracing::warn!("Health check cache ping failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "disconnected")
        }
    };

    tracing::debug!("Health check completed with status: {}", status);

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            cache: cache.to_string(),
            environment: state.config.environment.clone(),
            version: SERVICE_VERSION.to_string(),
        }),
    )
}
