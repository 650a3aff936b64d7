pub mod signin;
pub mod signout;
pub mod signup;

use axum::extract::rejection::JsonRejection;

use crate::error::ApiError;

/// Malformed auth bodies are plain 400s rather than axum's text rejection.
pub(crate) fn bad_body(rejection: JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "Rejected auth request body");
    ApiError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
}
