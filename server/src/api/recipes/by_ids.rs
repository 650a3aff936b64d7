use axum::{
    extract::{Query, State},
    Json,
};
use potluck_core::Recipe;
use serde::Deserialize;
use utoipa::IntoParams;

use super::parse_ids;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ByIdsParams {
    /// Comma-separated recipe ids
    pub ids: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/recipes-by-ids",
    tag = "recipes",
    params(ByIdsParams),
    responses(
        (status = 200, description = "Recipes with the given ids, unknown ids skipped", body = Vec<Recipe>),
        (status = 400, description = "Missing or malformed ids", body = ErrorResponse)
    )
)]
pub async fn recipes_by_ids(
    State(state): State<AppState>,
    Query(params): Query<ByIdsParams>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let raw = params
        .ids
        .ok_or_else(|| ApiError::bad_request("IDs parameter is required"))?;
    let ids = parse_ids(&raw)?;

    Ok(Json(state.access().get_by_ids(&ids).await))
}
