use axum::{
    extract::Query,
    response::{IntoResponse, Response},
    Json,
};
use potluck_core::content::{self, NewsArticle, NewsPage};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::recipes::parse_number;
use crate::api::ErrorResponse;
use crate::error::ApiError;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NewsParams {
    /// A single article
    pub id: Option<String>,
    /// 1-based page of articles
    pub page: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/news",
    tag = "content",
    params(NewsParams),
    responses(
        (status = 200, description = "A page of articles, or one article for ?id=", body = NewsPage),
        (status = 404, description = "Article not found", body = ErrorResponse)
    )
)]
pub async fn news(Query(params): Query<NewsParams>) -> Result<Response, ApiError> {
    if let Some(raw) = params.id.as_deref() {
        let article: NewsArticle = parse_number(Some(raw))
            .and_then(content::news_article)
            .ok_or_else(|| ApiError::not_found("Article not found"))?;
        return Ok(Json(article).into_response());
    }

    let page = parse_number(params.page.as_deref()).unwrap_or(1);
    Ok(Json(content::news_page(page)).into_response())
}
