//! API routes.
//!
//! Two routers: the public decoy surface and the internal health/metrics
//! surface. They are bound to different listeners.

pub mod decoy;
pub mod health;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Creates the public decoy router.
///
/// Every configured decoy path accepts any method; all other paths fall
/// through to the not-found capture.
pub fn router(state: AppState) -> Router {
    let routes = state
        .decoys
        .paths()
        .fold(Router::new(), |router, path| {
            router.route(path, any(decoy::capture_handler))
        });

    routes
        .fallback(decoy::capture_handler)
        .with_state(state)
}

/// Creates the internal router for health probes and metrics.
pub fn internal_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
