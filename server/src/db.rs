use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use potluck_core::{BlobError, IdentityError, StoreError};
use thiserror::Error;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection failed: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("Query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database task failed: {0}")]
    Join(String),
}

pub fn create_pool(database_url: &str) -> Result<DbPool, DbError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::Migration(e.to_string()))?;
    if !applied.is_empty() {
        tracing::info!(count = applied.len(), "Applied database migrations");
    }

    Ok(pool)
}

/// Run blocking diesel work on a pooled connection off the async executor.
pub async fn run<T, F>(pool: &DbPool, work: F) -> Result<T, DbError>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> Result<T, DbError> + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut conn = pool.get()?;
        work(&mut conn)
    })
    .await
    .map_err(|e| DbError::Join(e.to_string()))?
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Query(diesel::result::Error::NotFound) => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

impl From<DbError> for BlobError {
    fn from(err: DbError) -> Self {
        BlobError::Backend(err.to_string())
    }
}

impl From<DbError> for IdentityError {
    fn from(err: DbError) -> Self {
        IdentityError::Backend(err.to_string())
    }
}
