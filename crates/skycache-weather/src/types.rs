use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single weather observation for a named location.
///
/// The location name is echoed back exactly as requested; it is also the
/// cache key the reading is stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub description: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

impl WeatherReading {
    /// Encode for storage and transport.
    pub fn to_json(&self) -> Result<Vec<u8>, WeatherError> {
        serde_json::to_vec(self).map_err(|e| WeatherError::Parse(e.to_string()))
    }

    /// Decode a stored value. Fails for anything that is not a reading.
    pub fn from_json(bytes: &[u8]) -> Result<Self, WeatherError> {
        serde_json::from_slice(bytes).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid location: {0:?}")]
    InvalidLocation(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Cache store errors
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache command {command} failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },
}

impl CacheError {
    pub(crate) fn command(command: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Command {
            command,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> WeatherReading {
        WeatherReading {
            temperature: 22.5,
            humidity: 65.0,
            wind_speed: 12.0,
            description: "Partly cloudy".to_string(),
            location: "paris".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json: serde_json::Value = serde_json::from_slice(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["location"], "paris");
        assert_eq!(json["windSpeed"], 12.0);
        assert_eq!(json["description"], "Partly cloudy");
        assert_eq!(json["timestamp"], "2026-01-30T12:00:00Z");
        assert!(json.get("wind_speed").is_none());
    }

    #[test]
    fn test_decodes_rfc3339_offset_timestamp() {
        let raw = br#"{"temperature":24.5,"humidity":70,"windSpeed":15,"description":"Partly cloudy","location":"London","timestamp":"2026-01-30T13:00:00+01:00"}"#;
        let reading = WeatherReading::from_json(raw).unwrap();
        assert_eq!(reading.location, "London");
        assert_eq!(reading.humidity, 70.0);
        assert_eq!(reading.timestamp, Utc.with_ymd_and_hms(2026, 1, 30, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_non_reading_values() {
        assert!(WeatherReading::from_json(b"not json").is_err());
        assert!(WeatherReading::from_json(br#"{"location":"paris"}"#).is_err());
        assert!(WeatherReading::from_json(b"[1,2,3]").is_err());
        // every field is required and the timestamp must be RFC 3339
        let bad_timestamp = br#"{"temperature":20.0,"humidity":50.0,"windSpeed":5.0,"description":"Clear","location":"paris","timestamp":"yesterday"}"#;
        assert!(WeatherReading::from_json(bad_timestamp).is_err());
    }

    #[test]
    fn test_cache_error_display() {
        let err = CacheError::command("GET", "connection reset");
        assert_eq!(err.to_string(), "Cache command GET failed: connection reset");
    }
}
