use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use potluck_core::{Identity, SignInForm};
use serde::Serialize;
use utoipa::ToSchema;

use super::bad_body;
use crate::api::ErrorResponse;
use crate::auth::SESSION_COOKIE;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub success: bool,
    pub message: String,
    /// Bearer token for API clients; browsers get the same value as a cookie.
    pub token: String,
    pub user: Identity,
    pub expires_at: DateTime<Utc>,
}

/// `Set-Cookie` value for a session lasting until `expires_at`.
pub fn session_cookie(token: &str, expires_at: DateTime<Utc>) -> String {
    let max_age = (expires_at - Utc::now()).num_seconds().max(0);
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, max_age
    )
}

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    tag = "auth",
    request_body(content = SignInForm, example = json!({"email": "ada@example.com", "password": "Secret1!"})),
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 422, description = "Field validation failed", body = ErrorResponse)
    )
)]
pub async fn signin(
    State(state): State<AppState>,
    body: Result<Json<SignInForm>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(form) = body.map_err(bad_body)?;
    let session = state.auth().sign_in(&form).await?;

    let cookie = HeaderValue::from_str(&session_cookie(&session.token, session.expires_at))
        .map_err(|e| {
            tracing::error!("Session token is not a valid header value: {}", e);
            ApiError::internal()
        })?;

    let body = SignInResponse {
        success: true,
        message: "Login successful".to_string(),
        token: session.token,
        user: session.user,
        expires_at: session.expires_at,
    };

    Ok(([(header::SET_COOKIE, cookie)], Json(body)).into_response())
}
