//! Error types shared across the SkyCache crates.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port for {field}: {value:?}")]
    InvalidPort { field: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns an operator-facing hint for fixing the problem.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::InvalidPort { .. } => "Ports must be numbers between 1 and 65535.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your environment variables.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_port_display() {
        let err = ConfigError::InvalidPort {
            field: "PORT".into(),
            value: "abc".into(),
        };
        assert_eq!(err.to_string(), "Invalid port for PORT: \"abc\"");
        assert!(err.user_message().contains("65535"));
    }

    #[test]
    fn test_invalid_display() {
        let err = ConfigError::Invalid("port: Port cannot be 0".into());
        assert!(err.to_string().contains("Port cannot be 0"));
        assert!(err.user_message().contains("environment variables"));
    }
}
