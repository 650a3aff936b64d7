use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use potluck_core::{ActionError, Recipe, RecipeFilter};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::{parse_ids, parse_number};
use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;

/// Query parameters for listing recipes. Which mode runs depends on which
/// parameters are present: `ids`, then `slug`, then any filter.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListRecipesParams {
    /// Comma-separated recipe ids
    pub ids: Option<String>,
    /// Exact slug
    pub slug: Option<String>,
    /// Substring of title or description
    pub search: Option<String>,
    /// Easy, Medium, Hard or "all"
    pub difficulty: Option<String>,
    /// Category name or "all"
    pub category: Option<String>,
    /// 1-based page number
    pub page: Option<String>,
    /// Page size (max 100)
    pub limit: Option<String>,
}

impl ListRecipesParams {
    fn has_filter(&self) -> bool {
        self.search.is_some()
            || self.difficulty.is_some()
            || self.category.is_some()
            || self.page.is_some()
            || self.limit.is_some()
    }
}

/// One page of the recipe explorer.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListResponse {
    pub recipes: Vec<Recipe>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "recipes",
    params(ListRecipesParams),
    responses(
        (status = 200, description = "A recipe list, a single recipe for ?slug=, or a page for filters", body = RecipeListResponse),
        (status = 400, description = "Malformed ids", body = ErrorResponse),
        (status = 404, description = "No recipe with that slug", body = ErrorResponse),
        (status = 422, description = "Unknown difficulty or category", body = ErrorResponse)
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<ListRecipesParams>,
) -> Result<Response, ApiError> {
    let access = state.access();

    if let Some(raw) = params.ids.as_deref() {
        let ids = parse_ids(raw)?;
        return Ok(Json(access.get_by_ids(&ids).await).into_response());
    }

    if let Some(slug) = params.slug.as_deref() {
        let recipe = access.get_by_slug(slug).await.ok_or_else(|| {
            ApiError::not_found(format!("Recipe with slug '{}' not found.", slug))
        })?;
        return Ok(Json(recipe).into_response());
    }

    if params.has_filter() {
        let filter = RecipeFilter::from_params(
            params.search.as_deref(),
            params.difficulty.as_deref(),
            params.category.as_deref(),
            parse_number(params.page.as_deref()),
            parse_number(params.limit.as_deref()),
        )
        .map_err(ActionError::validation)?;

        let page = access.get_filtered(&filter).await;
        return Ok(Json(RecipeListResponse {
            total_pages: filter.total_pages(page.total),
            total: page.total,
            recipes: page.items,
            page: filter.page,
            limit: filter.limit,
        })
        .into_response());
    }

    Ok(Json(access.get_all().await).into_response())
}
