use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::error::ApiError;

pub const APP_KEY_HEADER: &str = "x-api-key";

/// Pro-content routes are called by a trusted front end that proves itself
/// with the shared application key.
pub async fn app_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(APP_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(key) if !state.app_key.is_empty() && key == &*state.app_key => Ok(next.run(request).await),
        _ => Err(ApiError::unauthorized("Invalid API key.")),
    }
}
