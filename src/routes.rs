//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_code}` - Weighted redirect
//! - `GET  /`             - Redirect with no code (400)
//! - `GET  /health`       - Health check: store and cache
//! - `/api/*`             - Shorten API (CORS enabled)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Fixed header set on `/api` responses
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, missing_code_handler, redirect_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the router with all routes and middleware, without path
/// normalization.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::api_routes(state.clone());

    Router::new()
        .route("/", get(missing_code_handler))
        .route("/health", get(health_handler))
        .route("/{short_code}", get(redirect_handler))
        .nest("/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before
/// routing so `/abc12/` resolves like `/abc12`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
