//! Sign-up, sign-in and sign-out flows over an [`IdentityProvider`].

use std::sync::Arc;

use crate::error::ActionError;
use crate::store::IdentityProvider;
use crate::types::{Identity, Session};
use crate::validation::{SignInForm, SignUpForm};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Signup successful! You can now sign in.";

#[derive(Clone)]
pub struct AuthService {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        AuthService { provider }
    }

    /// Validate the form and register the account.
    pub async fn sign_up(&self, form: &SignUpForm) -> Result<Identity, ActionError> {
        form.validate().map_err(ActionError::validation)?;

        let identity = self
            .provider
            .sign_up(
                &normalize_email(&form.email),
                &form.password,
                form.full_name.trim(),
            )
            .await?;

        tracing::info!(user_id = %identity.id, "User registered");
        Ok(identity)
    }

    pub async fn sign_in(&self, form: &SignInForm) -> Result<Session, ActionError> {
        form.validate().map_err(ActionError::validation)?;

        let session = self
            .provider
            .sign_in_with_password(&normalize_email(&form.email), &form.password)
            .await?;

        tracing::info!(user_id = %session.user.id, "User signed in");
        Ok(session)
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), ActionError> {
        self.provider.sign_out(token).await?;
        Ok(())
    }

    /// The identity behind a session token. A missing or expired token is
    /// `Ok(None)`; only provider failures are errors.
    pub async fn current_user(&self, token: Option<&str>) -> Result<Option<Identity>, ActionError> {
        match token {
            Some(token) if !token.is_empty() => Ok(self.provider.get_user(token).await?),
            _ => Ok(None),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryIdentityProvider;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryIdentityProvider::new()))
    }

    fn signup(email: &str) -> SignUpForm {
        SignUpForm {
            full_name: "Ada Cook".to_string(),
            email: email.to_string(),
            password: "Secret1!x".to_string(),
            confirm_password: "Secret1!x".to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_then_sign_in() {
        let auth = service();
        let identity = auth.sign_up(&signup("ada@example.com")).await.unwrap();
        assert_eq!(identity.full_name.as_deref(), Some("Ada Cook"));

        let session = auth
            .sign_in(&SignInForm {
                email: "ada@example.com".to_string(),
                password: "Secret1!x".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user, identity);
        assert_eq!(
            auth.current_user(Some(&session.token)).await.unwrap(),
            Some(identity)
        );

        auth.sign_out(&session.token).await.unwrap();
        assert_eq!(auth.current_user(Some(&session.token)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_conflicts() {
        let auth = service();
        auth.sign_up(&signup("ada@example.com")).await.unwrap();
        let err = auth.sign_up(&signup("ada@example.com")).await.unwrap_err();
        assert!(matches!(err, ActionError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_provider() {
        let auth = service();
        let err = auth.sign_up(&signup("not-an-email")).await.unwrap_err();
        match err {
            ActionError::Validation { field_errors, .. } => {
                assert_eq!(
                    field_errors["email"],
                    vec!["Please enter a valid email address"]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let auth = service();
        auth.sign_up(&signup("ada@example.com")).await.unwrap();
        let err = auth
            .sign_in(&SignInForm {
                email: "ada@example.com".to_string(),
                password: "Wrong1!xx".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidCredentials(_)));
    }

    #[tokio::test]
    async fn test_no_token_is_anonymous() {
        assert_eq!(service().current_user(None).await.unwrap(), None);
    }
}
