mod error;
mod handlers;
pub mod middleware;
pub mod validation;

pub use error::ApiError;
pub use middleware::{RateLimiter, SecurityConfig};

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::EstimateStore;

/// Store handle shared by all handlers.
pub type SharedStore = Arc<dyn EstimateStore>;

/// Router with security disabled (local use and tests).
pub fn create_router(store: impl EstimateStore + 'static) -> Router {
    create_router_with_config(Arc::new(store), SecurityConfig::disabled())
}

pub fn create_router_with_config(store: SharedStore, config: SecurityConfig) -> Router {
    let mut protected = Router::new()
        // Estimates
        .route(
            "/estimates",
            get(handlers::list_estimates).post(handlers::create_estimate),
        )
        .route("/estimates/calculate", post(handlers::calculate_estimate))
        .route("/estimates/{id}", get(handlers::get_estimate))
        .route("/estimates/{id}/export", get(handlers::export_estimate))
        // Catalog
        .route("/catalog", get(handlers::get_catalog))
        .route_layer(from_fn_with_state(
            config.clone(),
            middleware::auth_middleware,
        ));

    if let Some(limiter) = config.rate_limiter.clone() {
        protected = protected.route_layer(from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    let api = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(config.cors_layer()),
        )
        .with_state(store)
}
