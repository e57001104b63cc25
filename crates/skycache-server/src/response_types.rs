//! # Web API Response Types
//!
//! Response bodies and the error type handlers return. Errors render as a
//! small JSON object with the matching HTTP status.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use skycache_weather::WeatherReading;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Key not found: {key}")]
    NotFound { key: String },

    #[error("Error fetching weather data")]
    WeatherFetch,

    #[error("Error processing weather data")]
    Serialization,
}

impl ApiError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::WeatherFetch | Self::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::WeatherFetch => "weather_fetch_failed",
            Self::Serialization => "serialization_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            message: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Error body: `{"error": "...", "message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Body of `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Serialized as `redis`, the name existing clients read
    #[serde(rename = "redis")]
    pub cache: String,
    pub environment: String,
    pub version: String,
}

/// Body of `GET /api/cache/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatsResponse {
    /// Every key seen by the scan, decodable or not
    pub total_keys: usize,
    /// Keys with a positive remaining TTL
    #[serde(rename = "keysWithTTL")]
    pub keys_with_ttl: usize,
    pub cached_locations: Vec<String>,
    pub data: BTreeMap<String, WeatherReading>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::WeatherFetch.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Serialization.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_stats_field_names() {
        let json = serde_json::to_value(CacheStatsResponse::default()).unwrap();
        assert_eq!(json["totalKeys"], 0);
        assert_eq!(json["keysWithTTL"], 0);
        assert!(json["cachedLocations"].as_array().unwrap().is_empty());
        assert!(json["data"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_health_field_names() {
        let health = HealthResponse {
            status: "healthy".into(),
            cache: "connected".into(),
            environment: "development".into(),
            version: "1.0.0".into(),
        };
        let json = serde_json::to_value(&health).unwrap();
        assert_eq!(json["redis"], "connected");
        assert!(json.get("cache").is_none());
        assert_eq!(json["status"], "healthy");
    }

    #[test]
    fn test_error_response_status() {
        let response = ApiError::not_found("paris").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
