pub mod by_ids;
pub mod create;
pub mod delete;
pub mod form;
pub mod get;
pub mod list;
pub mod related;
pub mod update;

use axum::routing::get;
use axum::Router;
use utoipa::OpenApi;

use crate::error::ApiError;
use crate::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        list::list_recipes,
        create::create_recipe,
        by_ids::recipes_by_ids,
        related::related_recipes,
        get::get_recipe,
        get::get_recipe_for_edit,
        update::update_recipe,
        delete::delete_recipe,
    ),
    components(schemas(
        list::RecipeListResponse,
        form::RecipeSubmission,
        delete::DeleteRecipeResponse,
    ))
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/recipes",
            get(list::list_recipes).post(create::create_recipe),
        )
        .route("/api/recipes-by-ids", get(by_ids::recipes_by_ids))
        .route("/api/related-recipes", get(related::related_recipes))
        .route(
            "/api/recipe/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route("/api/recipe-for-edit/{id}", get(get::get_recipe_for_edit))
}

/// Parse a comma-separated id list. Blank entries are skipped.
pub fn parse_ids(raw: &str) -> Result<Vec<i64>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| ApiError::bad_request(format!("Invalid recipe id: {}", part)))
        })
        .collect()
}

/// Lenient integer parse for query parameters: garbage reads as absent.
pub fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
