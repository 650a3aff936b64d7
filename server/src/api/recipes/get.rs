use axum::{
    extract::{Path, State},
    Json,
};
use potluck_core::{ActionError, Identity, Recipe};

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

/// Load a recipe only its author may see through these routes.
async fn owned_recipe(state: &AppState, user: &Identity, id: i64) -> Result<Recipe, ApiError> {
    let recipe = state
        .access()
        .get_by_id(id)
        .await
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;

    if recipe.author_id != user.id {
        return Err(ActionError::Forbidden("You can only edit your own recipes".to_string()).into());
    }

    Ok(recipe)
}

#[utoipa::path(
    get,
    path = "/api/recipe/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe owned by the caller", body = Recipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Recipe>, ApiError> {
    owned_recipe(&state, &user, id).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/recipe-for-edit/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe to prefill the edit form", body = Recipe),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_recipe_for_edit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = owned_recipe(&state, &user, id).await?;
    tracing::debug!(recipe_id = id, "Loaded recipe for editing");
    Ok(Json(recipe))
}
