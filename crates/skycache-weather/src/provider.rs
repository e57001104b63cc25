//! Weather data sources.
//!
//! Handlers depend on the [`WeatherProvider`] trait only, so the synthetic
//! source below can be swapped for a real upstream without touching them.

use async_trait::async_trait;
use chrono::Utc;

use crate::types::{WeatherError, WeatherReading};

const SYNTHETIC_DESCRIPTION: &str = "Partly cloudy";

/// Fetches the current reading for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<WeatherReading, WeatherError>;
}

/// Placeholder provider that fabricates readings from the wall clock.
///
/// Numeric fields vary with the current nanosecond; the description is fixed.
#[derive(Clone, Default)]
pub struct SyntheticProvider {
    api_key: Option<String>,
}

impl std::fmt::Debug for SyntheticProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticProvider")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl SyntheticProvider {
    /// `api_key` is kept for the real upstream; synthetic readings ignore it.
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn reading_at(location: &str, n: u64) -> WeatherReading {
        WeatherReading {
            temperature: 22.5 + (n % 5) as f64,
            humidity: 65.0 + (n % 10) as f64,
            wind_speed: 12.0 + (n % 8) as f64,
            description: SYNTHETIC_DESCRIPTION.to_string(),
            location: location.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[async_trait]
impl WeatherProvider for SyntheticProvider {
    async fn fetch(&self, location: &str) -> Result<WeatherReading, WeatherError> {
        if location.is_empty() {
            return Err(WeatherError::InvalidLocation(location.to_string()));
        }

        let nanos = u64::from(Utc::now().timestamp_subsec_nanos());
        let reading = Self::reading_at(location, nanos);
        tracing::debug!(location, temperature = reading.temperature, "Generated synthetic reading");
        Ok(reading)
    }
}
