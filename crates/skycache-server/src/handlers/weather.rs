//! Read-through weather lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::response_types::ApiError;
use crate::state::AppState;

/// Weather for a location: GET /api/weather/{location}
///
/// Serves the cached bytes verbatim on a hit. On a miss, or when the cache
/// read fails, asks the provider and stores the result for `cache_ttl`.
/// The location is used as the cache key exactly as given.
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Path(location): Path<String>,
) -> Result<Response, ApiError> {
    tracing::info!("Getting weather data for location: {}", location);

    match state.cache.get(&location).await {
        Ok(Some(cached)) => {
            tracing::info!("Cache hit for location: {}", location);
            return Ok(json_bytes(cached));
        }
        Ok(None) => tracing::info!("Cache miss for location: {}", location),
        Err(e) => tracing::warn!("Cache miss for location: {}, error: {}", location, e),
    }

    let reading = state.provider.fetch(&location).await.map_err(|e| {
        tracing::error!("Error fetching weather data for {}: {}", location, e);
        ApiError::WeatherFetch
    })?;

    let body = reading.to_json().map_err(|e| {
        tracing::error!("Error serializing weather data: {}", e);
        ApiError::Serialization
    })?;

    match state.cache.set(&location, &body, state.cache_ttl).await {
        Ok(()) => tracing::info!("Successfully cached weather data for: {}", location),
        // The fresh reading is still served
        Err(e) => tracing::warn!("Error caching weather data for {}: {}", location, e),
    }

    Ok(json_bytes(body))
}

fn json_bytes(body: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
