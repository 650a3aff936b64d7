use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::AppState;

#[derive(OpenApi)]
#[openapi(paths(current_user), components(schemas(UserResponse)))]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/user", get(current_user))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    /// Name shown as the author of recipes
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "auth",
    responses(
        (status = 200, description = "The signed-in user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn current_user(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(UserResponse {
        name: user.display_name(),
        id: user.id,
        email: user.email,
        full_name: user.full_name,
    })
}
