use axum::Json;
use potluck_core::content::{self, GalleryEntry};

#[utoipa::path(
    get,
    path = "/api/instagram-gallery",
    tag = "content",
    responses(
        (status = 200, description = "Social gallery entries", body = Vec<GalleryEntry>)
    )
)]
pub async fn gallery() -> Json<Vec<GalleryEntry>> {
    Json(content::gallery())
}
