//! Handler for link shortening endpoint.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::{Map, Value, json};

use crate::api::dto::shorten::ShortenResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short code for one or more weighted destinations.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     { "original_url": "https://a.example.com", "weight": 3 },
///     { "original_url": "https://b.example.com", "weight": 1 }
///   ]
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// {
///   "short_code": "aZ3k9",
///   "short_url": "https://short.ly/aZ3k9",
///   "targets": [
///     { "url": "https://a.example.com", "weight": 3, "visits": 0 },
///     { "url": "https://b.example.com", "weight": 1, "visits": 0 }
///   ]
/// }
/// ```
///
/// # Errors
///
/// - 400 `Invalid JSON body` if the body does not parse
/// - 400 with a field/index message if validation fails
/// - 500 if every allocation attempt collided
/// - 503 if the store is unavailable
pub async fn shorten_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    let payload = parse_body(&body)?;

    let record = state.allocation_service.create_short_link(&payload).await?;
    let short_url = state.allocation_service.short_url(&record.short_code);

    Ok((
        StatusCode::CREATED,
        Json(ShortenResponse::new(record, short_url)),
    ))
}

/// Answers a CORS preflight for the shorten endpoint.
///
/// The CORS headers themselves are added by [`crate::api::middleware::cors::layer`].
pub async fn shorten_preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Answers any other method on the shorten endpoint with a JSON 405.
pub async fn shorten_method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "OPTIONS, POST")],
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// Parses the raw body as JSON. An empty body is treated as `{}` so that it
/// fails validation on the missing `urls` field rather than as malformed JSON.
fn parse_body(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_slice(body).map_err(|_| AppError::invalid_input("Invalid JSON body"))
}
