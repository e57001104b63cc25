//! # Cache Introspection Handlers
//!
//! Read-only views over the cache contents. Listing and stats scan the
//! entire keyspace on every call and are not paginated; they are meant for
//! small deployments and debugging.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use skycache_weather::WeatherReading;

use crate::response_types::{ApiError, CacheStatsResponse};
use crate::state::AppState;

/// List cached keys: GET /api/cache
///
/// Order is whatever the store returns. A failed scan yields an empty list.
pub async fn list_keys(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let keys = state.cache.keys().await.unwrap_or_else(|e| {
        tracing::warn!("Error scanning cache keys: {}", e);
        Vec::new()
    });
    Json(keys)
}

/// Decoded reading for one key: GET /api/cache/{key}
///
/// Absent keys, failed reads and values that are not a reading all answer 404.
pub async fn get_key(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Json<WeatherReading>, ApiError> {
    let raw = match state.cache.get(&key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return Err(ApiError::not_found(key)),
        Err(e) => {
            tracing::warn!("Error reading cache key {}: {}", key, e);
            return Err(ApiError::not_found(key));
        }
    };

    match WeatherReading::from_json(&raw) {
        Ok(reading) => Ok(Json(reading)),
        Err(e) => {
            tracing::warn!("Cache key {} does not hold a weather reading: {}", key, e);
            Err(ApiError::not_found(key))
        }
    }
}

/// Aggregate cache statistics: GET /api/cache/stats
///
/// One TTL and one GET per key. Keys whose value cannot be read or decoded
/// still count towards `totalKeys` but are left out of `data`.
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheStatsResponse> {
    let mut stats = CacheStatsResponse::default();

    let keys = match state.cache.keys().await {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!("Error scanning cache keys: {}", e);
            return Json(stats);
        }
    };

    for key in keys {
        stats.total_keys += 1;

        match state.cache.ttl(&key).await {
            Ok(Some(_)) => stats.keys_with_ttl += 1,
            Ok(None) => {}
            Err(e) => tracing::debug!("Error reading TTL for {}: {}", key, e),
        }

        let reading = match state.cache.get(&key).await {
            Ok(Some(raw)) => WeatherReading::from_json(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!("Error reading cache key {}: {}", key, e);
                None
            }
        };

        if let Some(reading) = reading {
            stats.cached_locations.push(reading.location.clone());
            stats.data.insert(key, reading);
        }
    }

    Json(stats)
}
