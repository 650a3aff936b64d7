use std::collections::BTreeMap;

use thiserror::Error;

/// Field name -> every message for the rules that field violated.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found")]
    NotFound,

    #[error("Record store failure: {0}")]
    Backend(String),

    #[error("Malformed record: {0}")]
    InvalidRecord(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    #[error("Blob storage failure: {0}")]
    Backend(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("User already registered")]
    AlreadyRegistered,

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("Password should be stronger: {0}")]
    WeakPassword(String),

    #[error("Identity provider failure: {0}")]
    Backend(String),
}

/// Outcome taxonomy for actions and routes. Every collaborator failure is
/// translated into one of these before it reaches a response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: FieldErrors,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("User not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),
}

impl ActionError {
    pub fn validation(field_errors: FieldErrors) -> Self {
        ActionError::Validation {
            message: "Please fix the errors below".to_string(),
            field_errors,
        }
    }

    pub fn single_field(field: &str, message: impl Into<String>) -> Self {
        let mut field_errors = FieldErrors::new();
        field_errors.insert(field.to_string(), vec![message.into()]);
        Self::validation(field_errors)
    }
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ActionError::NotFound("Recipe not found".to_string()),
            other => {
                tracing::error!(error = %other, "record store failure");
                ActionError::Upstream("An unexpected error occurred. Please try again.".to_string())
            }
        }
    }
}

impl From<BlobError> for ActionError {
    fn from(err: BlobError) -> Self {
        tracing::error!(error = %err, "blob storage failure");
        ActionError::Upstream("Failed to store recipe image".to_string())
    }
}

impl From<IdentityError> for ActionError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::AlreadyRegistered => ActionError::Conflict(
                "An account with this email already exists. Please try logging in instead."
                    .to_string(),
            ),
            IdentityError::InvalidCredentials => ActionError::InvalidCredentials(
                "Invalid email or password. Please check your credentials and try again."
                    .to_string(),
            ),
            IdentityError::WeakPassword(_) => ActionError::BadRequest(
                "Password doesn't meet security requirements. Please choose a stronger password."
                    .to_string(),
            ),
            IdentityError::Backend(msg) => {
                tracing::error!(error = %msg, "identity provider failure");
                ActionError::Upstream("An unexpected error occurred. Please try again.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: ActionError = StoreError::NotFound.into();
        assert_eq!(err, ActionError::NotFound("Recipe not found".to_string()));
    }

    #[test]
    fn test_backend_failures_hide_details() {
        let err: ActionError = StoreError::Backend("connection refused".to_string()).into();
        match err {
            ActionError::Upstream(msg) => assert!(!msg.contains("connection refused")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_registration_is_conflict() {
        let err: ActionError = IdentityError::AlreadyRegistered.into();
        assert!(matches!(err, ActionError::Conflict(_)));
    }

    #[test]
    fn test_single_field() {
        let err = ActionError::single_field("image", "Image size must be less than 8MB.");
        match err {
            ActionError::Validation { field_errors, .. } => {
                assert_eq!(
                    field_errors.get("image").unwrap(),
                    &vec!["Image size must be less than 8MB.".to_string()]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
