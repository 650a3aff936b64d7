use axum::{extract::rejection::JsonRejection, extract::State, Json};
use potluck_core::auth::SIGNUP_SUCCESS_MESSAGE;
use potluck_core::SignUpForm;

use super::bad_body;
use crate::api::{ErrorResponse, MessageResponse};
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body(content = SignUpForm, example = json!({
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "password": "Secret1!",
        "confirmPassword": "Secret1!"
    })),
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Field validation failed", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignUpForm>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(form) = body.map_err(bad_body)?;
    state.auth().sign_up(&form).await?;

    Ok(Json(MessageResponse::ok(SIGNUP_SUCCESS_MESSAGE)))
}
