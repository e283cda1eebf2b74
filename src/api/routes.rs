//! API route configuration.
//!
//! Every API response carries CORS headers via [`crate::api::middleware::cors`].

use crate::api::handlers::{
    shorten_handler, shorten_method_not_allowed_handler, shorten_preflight_handler,
};
use crate::api::middleware::cors;
use crate::state::AppState;
use axum::{Router, middleware, routing::post};

/// API routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST    /shorten` - Create a weighted short link
/// - `OPTIONS /shorten` - CORS preflight
///
/// Other methods get a JSON `405`.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/shorten",
            post(shorten_handler)
                .options(shorten_preflight_handler)
                .fallback(shorten_method_not_allowed_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, cors::layer))
}
