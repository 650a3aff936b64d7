use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use potluck_core::Recipe;

use super::form::{read_submission, RecipeSubmission};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "recipes",
    request_body(content = RecipeSubmission, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Recipe created", body = Recipe),
        (status = 400, description = "Malformed submission", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 422, description = "Invalid recipe fields or image", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Recipe>), ApiError> {
    let (form, image) = read_submission(multipart).await?;
    let recipe = state.actions().create(Some(&user), form, image).await?;

    Ok((StatusCode::CREATED, Json(recipe)))
}
