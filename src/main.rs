use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};

use skycache_core::Config;
use skycache_server::{create_app, AppState, SERVICE_VERSION};
use skycache_weather::{with_retry, RedisCache, RetryConfig, SyntheticProvider};

#[tokio::main]
async fn main() -> Result<()> {
    skycache_core::init();

    info!("Starting SkyCache weather service");
    info!("   Version: {}", SERVICE_VERSION);

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("{}", e.user_message());
            return Err(e).context("Failed to load configuration");
        }
    };
    config.log_summary();

    let cache = RedisCache::new(&config.redis_url()).context("Invalid Redis address")?;

    info!(
        "Connecting to Redis at {}:{}...",
        config.redis_host, config.redis_port
    );
    match with_retry(&RetryConfig::default(), || cache.connect()).await {
        Ok(()) => info!("Successfully connected to Redis"),
        // Serve anyway; /api/health reports the outage
        Err(e) => warn!("Could not establish initial Redis connection: {}", e),
    }

    let provider = SyntheticProvider::new(config.weather_api_key.clone());
    if !provider.has_api_key() {
        info!("No weather API key set; serving synthetic readings");
    }

    let bind_address = config.bind_address();
    let environment = config.environment.clone();
    let state = AppState::new(config, Arc::new(cache), Arc::new(provider));
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_address))?;

    info!(
        "Server starting on {} in {} mode",
        bind_address, environment
    );
    info!("   Press Ctrl+C to shutdown gracefully");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("SkyCache shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}
