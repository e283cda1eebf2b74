//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to one of its targets.
///
/// # Endpoint
///
/// `GET /{short_code}`
///
/// # Request Flow
///
/// 1. Look the record up (cache first, then store)
/// 2. Normalise target weights to `f64`
/// 3. Draw one target with probability proportional to its weight
/// 4. Return `301 Moved Permanently` with an empty body
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 503 Service Unavailable if the store cannot be reached.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_code): Path<String>,
) -> Result<Response, AppError> {
    redirect(&state, Some(&short_code)).await
}

/// Handles `GET /`, where the short code path segment is absent.
///
/// Always answers 400 `Missing short code`.
pub async fn missing_code_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    redirect(&state, None).await
}

async fn redirect(state: &AppState, short_code: Option<&str>) -> Result<Response, AppError> {
    let location = state.redirect_service.resolve(short_code).await?;

    let location = HeaderValue::from_str(&location).map_err(|_| {
        AppError::internal(format!("target URL is not a valid header value: {location}"))
    })?;

    Ok((
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
        "",
    )
        .into_response())
}
