//! CORS headers for the shorten endpoint.

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Headers a browser may send on a cross-origin shorten request.
pub const ALLOW_HEADERS: &str = "Content-Type,Authorization";

/// Methods accepted on the shorten endpoint.
pub const ALLOW_METHODS: &str = "OPTIONS,POST,GET";

/// Adds CORS and content-type headers to every shorten response.
///
/// Runs after the handler, so success bodies, validation errors and
/// preflight answers all carry the same headers:
///
/// ```text
/// Access-Control-Allow-Origin: <configured origin>
/// Access-Control-Allow-Headers: Content-Type,Authorization
/// Access-Control-Allow-Methods: OPTIONS,POST,GET
/// Content-Type: application/json
/// ```
///
/// # Example
///
/// ```rust,ignore
/// let api = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), cors::layer));
/// ```
pub async fn layer(State(st): State<AppState>, req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        st.cors_allow_origin.clone(),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers
        .entry(header::CONTENT_TYPE)
        .or_insert_with(|| HeaderValue::from_static("application/json"));

    response
}
