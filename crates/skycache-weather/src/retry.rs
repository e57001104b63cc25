//! Startup retry for establishing the cache connection.
//!
//! Only used while the service boots. Request handlers never retry: a cache
//! failure there is logged and treated as a miss.

use std::future::Future;
use std::time::Duration;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_BACKOFF_STEP_MS: u64 = 1000;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failure; grows linearly with each attempt
    pub backoff_step: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_step: Duration::from_millis(DEFAULT_BACKOFF_STEP_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, backoff_step_ms: u64) -> Self {
        Self {
            max_attempts,
            backoff_step: Duration::from_millis(backoff_step_ms),
        }
    }

    /// Delay before the next attempt after `attempt` (1-based) failed
    pub fn delay_after_attempt(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }
}

/// Run `operation` until it succeeds or attempts run out.
///
/// Returns the last error when every attempt failed.
pub async fn with_retry<T, E, F, Fut>(config: &RetryConfig, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!("Succeeded on attempt {} of {}", attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(e) if attempt >= max_attempts => {
                tracing::error!("All {} attempts exhausted: {}", max_attempts, e);
                return Err(e);
            }
            Err(e) => {
                let delay = config.delay_after_attempt(attempt);
                tracing::warn!(
                    "Attempt {} of {} failed: {}; retrying in {:?}",
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
