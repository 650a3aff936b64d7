use axum::{
    extract::{Query, State},
    Json,
};
use potluck_core::access::DEFAULT_RELATED_LIMIT;
use potluck_core::filter::MAX_PAGE_SIZE;
use potluck_core::{ActionError, Category, Recipe};
use serde::Deserialize;
use utoipa::IntoParams;

use super::parse_number;
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RelatedParams {
    /// Category the related recipes must contain
    pub category: Option<String>,
    /// Slug of the recipe being viewed
    pub exclude: Option<String>,
    /// Maximum number of recipes (default 3)
    pub limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/related-recipes",
    tag = "recipes",
    params(RelatedParams),
    responses(
        (status = 200, description = "Other recipes in the same category", body = Vec<Recipe>),
        (status = 400, description = "Missing category", body = ErrorResponse),
        (status = 422, description = "Unknown category", body = ErrorResponse)
    )
)]
pub async fn related_recipes(
    State(state): State<AppState>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let raw = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::bad_request("Category parameter is required"))?;
    let category: Category = raw
        .parse()
        .map_err(|e: String| ActionError::single_field("category", e))?;

    let limit = parse_number(params.limit.as_deref())
        .unwrap_or(DEFAULT_RELATED_LIMIT)
        .clamp(1, MAX_PAGE_SIZE);
    let exclude = params.exclude.as_deref().unwrap_or_default();

    Ok(Json(
        state
            .access()
            .get_related(category, exclude, limit)
            .await,
    ))
}
