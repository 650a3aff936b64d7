pub mod auth;
pub mod gallery;
pub mod images;
pub mod news;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for public endpoints (no auth required)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(auth::signup::signup))
        .route("/api/auth/signin", post(auth::signin::signin))
        .route("/api/auth/signout", post(auth::signout::signout))
        .route("/api/news", get(news::news))
        .route("/api/instagram-gallery", get(gallery::gallery))
        .route("/api/images/{path}", get(images::get_image))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup::signup,
        auth::signin::signin,
        auth::signout::signout,
        news::news,
        gallery::gallery,
        images::get_image,
    ),
    components(schemas(
        potluck_core::SignUpForm,
        potluck_core::SignInForm,
        auth::signin::SignInResponse,
        potluck_core::content::NewsArticle,
        potluck_core::content::NewsPage,
        potluck_core::content::GalleryEntry,
    ))
)]
pub struct ApiDoc;
