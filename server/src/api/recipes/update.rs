use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use potluck_core::Recipe;

use super::form::{read_submission, RecipeSubmission};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    put,
    path = "/api/recipe/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe ID")),
    request_body(content = RecipeSubmission, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Recipe updated", body = Recipe),
        (status = 400, description = "Malformed submission", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse),
        (status = 422, description = "Invalid recipe fields or image", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<Recipe>, ApiError> {
    let (form, image) = read_submission(multipart).await?;
    let recipe = state.actions().update(Some(&user), id, form, image).await?;

    Ok(Json(recipe))
}
