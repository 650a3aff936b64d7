use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use potluck_core::{ImageUpload, RecipeForm};
use utoipa::ToSchema;

use crate::error::ApiError;

/// Multipart body for creating or editing a recipe.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct RecipeSubmission {
    /// JSON-encoded recipe fields.
    #[schema(value_type = RecipeForm)]
    pub recipe: String,
    /// Optional JPEG, PNG, GIF or WebP image.
    #[schema(value_type = Option<String>, format = Binary)]
    pub image: Option<Vec<u8>>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e);
    let message = if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        "Request too large".to_string()
    } else {
        format!("Failed to read multipart data: {}", e.body_text())
    };
    ApiError::new(e.status(), message)
}

/// Read the `recipe` JSON part and the optional `image` file part.
/// An image part without bytes counts as no image.
pub async fn read_submission(
    mut multipart: Multipart,
) -> Result<(RecipeForm, Option<ImageUpload>), ApiError> {
    let mut form = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("recipe") => {
                let text = field.text().await.map_err(multipart_error)?;
                let parsed: RecipeForm = serde_json::from_str(&text)
                    .map_err(|e| ApiError::bad_request(format!("Invalid recipe data: {}", e)))?;
                form = Some(parsed);
            }
            Some("image") => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let data = field.bytes().await.map_err(multipart_error)?;
                if !data.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        data: data.to_vec(),
                    });
                }
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unexpected multipart field");
            }
        }
    }

    let form = form.ok_or_else(|| ApiError::bad_request("Missing recipe data"))?;
    Ok((form, image))
}
