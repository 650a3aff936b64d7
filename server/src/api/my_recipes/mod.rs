use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use potluck_core::Recipe;
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use super::recipes::delete::DeleteRecipeResponse;
use super::recipes::parse_number;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(OpenApi)]
#[openapi(paths(list_my_recipes, delete_my_recipe))]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/my-recipes",
        get(list_my_recipes).delete(delete_my_recipe),
    )
}

#[utoipa::path(
    get,
    path = "/api/my-recipes",
    tag = "my-recipes",
    responses(
        (status = 200, description = "Recipes authored by the caller, newest first", body = Vec<Recipe>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_recipes(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<Recipe>> {
    Json(state.access().get_by_author(Some(&user)).await)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteMyRecipeParams {
    /// Recipe ID
    pub id: Option<String>,
}

#[utoipa::path(
    delete,
    path = "/api/my-recipes",
    tag = "my-recipes",
    params(DeleteMyRecipeParams),
    responses(
        (status = 200, description = "Recipe deleted", body = DeleteRecipeResponse),
        (status = 400, description = "Missing recipe id", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_my_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DeleteMyRecipeParams>,
) -> Result<Json<DeleteRecipeResponse>, ApiError> {
    let id = parse_number(params.id.as_deref())
        .ok_or_else(|| ApiError::bad_request("Recipe ID is required"))?;

    state.actions().delete(Some(&user), id).await?;
    Ok(Json(DeleteRecipeResponse::deleted()))
}
