pub mod config;
pub mod error;

pub use config::{Config, ConfigValidationError, ValidationResult};
pub use error::ConfigError;

/// Initialize logging for the service.
///
/// Honors `RUST_LOG`; defaults to `info` when unset or unparseable.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("SkyCache core initialized");
}
