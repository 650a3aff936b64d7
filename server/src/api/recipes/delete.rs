use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

pub const DELETED_MESSAGE: &str = "Recipe deleted successfully";

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteRecipeResponse {
    pub message: String,
}

impl DeleteRecipeResponse {
    pub fn deleted() -> Self {
        Self {
            message: DELETED_MESSAGE.to_string(),
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/recipe/{id}",
    tag = "recipes",
    params(("id" = i64, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe deleted", body = DeleteRecipeResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Recipe belongs to another user", body = ErrorResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_recipe(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteRecipeResponse>, ApiError> {
    state.actions().delete(Some(&user), id).await?;
    Ok(Json(DeleteRecipeResponse::deleted()))
}
