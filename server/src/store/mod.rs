//! Postgres-backed collaborators.

mod identity;
mod images;
mod recipes;

pub use identity::PgIdentityProvider;
pub use images::PgBlobStore;
pub use recipes::PgRecipeStore;
