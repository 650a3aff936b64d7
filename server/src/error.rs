use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use potluck_core::{ActionError, FieldErrors};

use crate::api::ErrorResponse;

/// An error on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub field_errors: Option<FieldErrors>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field_errors: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<ActionError> for ApiError {
    fn from(err: ActionError) -> Self {
        let status = match &err {
            ActionError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ActionError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ActionError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ActionError::InvalidCredentials(_) => StatusCode::UNAUTHORIZED,
            ActionError::Forbidden(_) => StatusCode::FORBIDDEN,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Conflict(_) => StatusCode::CONFLICT,
            ActionError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = err.to_string();
        let field_errors = match err {
            ActionError::Validation { field_errors, .. } => Some(field_errors),
            _ => None,
        };

        Self {
            status,
            message,
            field_errors,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                success: false,
                message: self.message,
                field_errors: self.field_errors,
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ActionError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                ActionError::Forbidden("You can only edit your own recipes".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                ActionError::NotFound("Recipe not found".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (ActionError::Conflict("taken".to_string()), StatusCode::CONFLICT),
            (
                ActionError::single_field("title", "Title is required"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn test_forbidden_message_keeps_prefix() {
        let err = ApiError::from(ActionError::Forbidden(
            "You can only delete your own recipes".to_string(),
        ));
        assert_eq!(err.message, "Forbidden: You can only delete your own recipes");
    }

    #[test]
    fn test_validation_carries_field_errors() {
        let err = ApiError::from(ActionError::single_field("title", "Title is required"));
        assert_eq!(err.message, "Please fix the errors below");
        assert!(err.field_errors.unwrap().contains_key("title"));
    }
}
