use url::Url;

use crate::error::ConfigError;

pub const ENV_WEATHER_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_REDIS_HOST: &str = "REDIS_HOST";
pub const ENV_REDIS_PORT: &str = "REDIS_PORT";
pub const ENV_PORT: &str = "PORT";
pub const ENV_ENVIRONMENT: &str = "ENVIRONMENT";

pub const DEFAULT_REDIS_HOST: &str = "localhost";
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Process-wide service configuration.
///
/// Read once at startup and never mutated afterwards. Every field has a
/// default except the weather API key, which is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Credential for the upstream weather provider
    pub weather_api_key: Option<String>,

    /// Cache (Redis) host
    pub redis_host: String,

    /// Cache (Redis) port
    pub redis_port: u16,

    /// HTTP listen port
    pub port: u16,

    /// Deployment environment name (development, staging, production...)
    pub environment: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weather_api_key: None,
            redis_host: DEFAULT_REDIS_HOST.to_string(),
            redis_port: DEFAULT_REDIS_PORT,
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is honored when present;
    /// variables already set in the environment take precedence.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment overrides from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset and fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let redis_port = match get(ENV_REDIS_PORT) {
            Some(raw) => parse_port(ENV_REDIS_PORT, &raw)?,
            None => {
                tracing::info!("Using default Redis port: {}", defaults.redis_port);
                defaults.redis_port
            }
        };

        let port = match get(ENV_PORT) {
            Some(raw) => parse_port(ENV_PORT, &raw)?,
            None => {
                tracing::info!("Using default port: {}", defaults.port);
                defaults.port
            }
        };

        let redis_host = get(ENV_REDIS_HOST).unwrap_or_else(|| {
            tracing::info!("Using default Redis host: {}", defaults.redis_host);
            defaults.redis_host.clone()
        });

        let environment = get(ENV_ENVIRONMENT).unwrap_or_else(|| {
            tracing::info!("Using default environment: {}", defaults.environment);
            defaults.environment.clone()
        });

        Ok(Self {
            weather_api_key: get(ENV_WEATHER_API_KEY),
            redis_host,
            redis_port,
            port,
            environment,
        })
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors abort loading.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::from_env()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.redis_host.trim().is_empty() {
            result.add_error("redis_host", "Redis host must not be blank");
        } else if let Err(e) = Url::parse(&self.redis_url()) {
            result.add_error("redis_host", format!("Invalid Redis address: {}", e));
        }

        if self.redis_port == 0 {
            result.add_error("redis_port", "Port cannot be 0");
        }

        if self.port == 0 {
            result.add_error("port", "Port cannot be 0");
        }

        if self.weather_api_key.is_none() {
            result.add_warning(
                "weather_api_key",
                "Weather API key not configured - using synthetic weather data",
            );
        }

        result
    }

    /// Connection URL for the Redis client (database 0, no password)
    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/0", self.redis_host, self.redis_port)
    }

    /// Socket address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Log the loaded configuration, excluding secrets
    pub fn log_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("{}: {}", ENV_REDIS_HOST, self.redis_host);
        tracing::info!("{}: {}", ENV_REDIS_PORT, self.redis_port);
        tracing::info!("{}: {}", ENV_PORT, self.port);
        tracing::info!("{}: {}", ENV_ENVIRONMENT, self.environment);
        tracing::info!(
            "{} length: {}",
            ENV_WEATHER_API_KEY,
            self.weather_api_key.as_deref().map_or(0, str::len)
        );
    }
}

fn parse_port(field: &str, raw: &str) -> Result<u16, ConfigError> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| ConfigError::InvalidPort {
            field: field.to_string(),
            value: raw.to_string(),
        })
}
