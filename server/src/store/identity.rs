use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use potluck_core::{Identity, IdentityError, IdentityProvider, Session};

use crate::auth::{generate_token, hash_password, hash_token, verify_password};
use crate::db::{self, DbError, DbPool};
use crate::models::{NewSession, NewUser, User};
use crate::schema::{sessions, users};

/// Shortest password the provider will store, whatever the form allowed.
const MIN_PASSWORD_LEN: usize = 6;

/// Accounts and sessions in Postgres, with argon2 password hashes and
/// sha256-hashed session tokens.
pub struct PgIdentityProvider {
    pool: DbPool,
    session_ttl: Duration,
}

impl PgIdentityProvider {
    pub fn new(pool: DbPool, session_ttl: Duration) -> Self {
        Self { pool, session_ttl }
    }
}

enum SignUpOutcome {
    Created(User),
    Duplicate,
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Identity, IdentityError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword(format!(
                "Password should be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let email = email.to_string();
        let password = password.to_string();
        let full_name = Some(full_name.trim().to_string()).filter(|n| !n.is_empty());

        let outcome = db::run(&self.pool, move |conn| {
            let password_hash =
                hash_password(&password).map_err(|e| DbError::PasswordHash(e.to_string()))?;

            let inserted = diesel::insert_into(users::table)
                .values(&NewUser {
                    email: &email,
                    password_hash: &password_hash,
                    full_name: full_name.as_deref(),
                })
                .returning(User::as_returning())
                .get_result(conn);

            match inserted {
                Ok(user) => Ok(SignUpOutcome::Created(user)),
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                    Ok(SignUpOutcome::Duplicate)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await?;

        match outcome {
            SignUpOutcome::Created(user) => Ok(user.into()),
            SignUpOutcome::Duplicate => Err(IdentityError::AlreadyRegistered),
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let email = email.to_string();
        let password = password.to_string();
        let expires_at = Utc::now() + self.session_ttl;

        let signed_in = db::run(&self.pool, move |conn| {
            let user: Option<User> = users::table
                .filter(users::email.eq(email.as_str()))
                .select(User::as_select())
                .first(conn)
                .optional()?;

            let Some(user) = user.filter(|u| verify_password(&password, &u.password_hash))
            else {
                return Ok(None);
            };

            let token = generate_token();
            diesel::insert_into(sessions::table)
                .values(&NewSession {
                    user_id: user.id,
                    token_hash: &hash_token(&token),
                    expires_at,
                })
                .execute(conn)?;

            Ok(Some((token, user)))
        })
        .await?;

        let (token, user) = signed_in.ok_or(IdentityError::InvalidCredentials)?;
        Ok(Session {
            token,
            user: user.into(),
            expires_at,
        })
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, IdentityError> {
        let token_hash = hash_token(token);

        let found = db::run(&self.pool, move |conn| {
            let found: Option<(User, DateTime<Utc>)> = sessions::table
                .inner_join(users::table)
                .filter(sessions::token_hash.eq(token_hash.as_str()))
                .filter(sessions::expires_at.gt(Utc::now()))
                .select((User::as_select(), sessions::expires_at))
                .first(conn)
                .optional()?;
            Ok(found)
        })
        .await?;

        Ok(found.map(|(user, expires_at)| Session {
            token: token.to_string(),
            user: user.into(),
            expires_at,
        }))
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        let token_hash = hash_token(token);
        db::run(&self.pool, move |conn| {
            diesel::delete(sessions::table.filter(sessions::token_hash.eq(token_hash.as_str())))
                .execute(conn)?;
            Ok(())
        })
        .await?;
        Ok(())
    }
}
