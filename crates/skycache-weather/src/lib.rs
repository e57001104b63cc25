//! Weather readings and the cache they are served from.
//!
//! Provides the [`WeatherReading`] model, the [`WeatherProvider`] source
//! abstraction and the [`CacheStore`] backends (Redis and in-memory).

pub mod cache;
pub mod provider;
pub mod retry;
pub mod types;

pub use cache::{CacheStore, InMemoryCache, RedisCache};
pub use provider::{SyntheticProvider, WeatherProvider};
pub use retry::{with_retry, RetryConfig};
pub use types::*;
