use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::{ErrorResponse, MessageResponse};
use crate::auth::{SessionToken, SESSION_COOKIE};
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/signout",
    tag = "auth",
    responses(
        (status = 200, description = "Session revoked and cookie cleared", body = MessageResponse),
        (status = 500, description = "Identity provider failure", body = ErrorResponse)
    ),
    security((), ("bearer_auth" = []))
)]
pub async fn signout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> Result<Response, ApiError> {
    if let Some(token) = token.as_deref() {
        state.auth().sign_out(token).await?;
    }

    let cleared = format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    Ok((
        [(header::SET_COOKIE, cleared)],
        Json(MessageResponse::ok("Signed out")),
    )
        .into_response())
}
