//! HTTP surface for SkyCache.
//!
//! [`create_app`] assembles the router; the binary binds it to a listener.

use std::sync::Arc;

use axum::http::{header, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod response_types;
pub mod routes;
pub mod state;

pub use response_types::{ApiError, CacheStatsResponse, ErrorResponse, HealthResponse};
pub use state::{AppState, CACHE_TTL, SERVICE_VERSION};

/// Create the web application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let common_middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let api = Router::new()
        .merge(routes::weather_routes())
        .merge(routes::cache_routes())
        .merge(routes::health_routes());

    let app = Router::new()
        .nest("/api", api)
        .layer(common_middleware)
        .with_state(Arc::new(state));

    tracing::info!("Web application created with all routes and middleware");
    app
}
