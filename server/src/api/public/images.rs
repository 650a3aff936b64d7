use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::api::ErrorResponse;
use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/images/{path}",
    tag = "images",
    params(("path" = String, Path, description = "Stored image path")),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
pub async fn get_image(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let blob = match state.blobs.download(&path).await {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            return Err(ApiError::not_found("Image not found"));
        }
        Err(e) => {
            tracing::error!("Failed to load image {}: {}", path, e);
            return Err(ApiError::internal());
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        blob.data,
    )
        .into_response())
}
