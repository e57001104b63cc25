//! Shared service context handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use skycache_core::Config;
use skycache_weather::{CacheStore, WeatherProvider};

/// How long a fetched reading stays in the cache
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Version reported by the health endpoint
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a request needs, constructed once at startup.
///
/// The cache and provider sit behind trait objects so tests can substitute
/// in-memory stores and deterministic providers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<dyn CacheStore>,
    pub provider: Arc<dyn WeatherProvider>,
    pub cache_ttl: Duration,
}

impl AppState {
    pub fn new(
        config: Config,
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            cache,
            provider,
            cache_ttl: CACHE_TTL,
        }
    }

    /// Override the entry lifetime.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
