//! Contracts for the external collaborators: the record store, blob storage
//! and the identity provider.
//!
//! The server backs these with Postgres; the in-memory implementations here
//! serve tests and local development.

mod memory;

pub use memory::{MemoryBlobStore, MemoryIdentityProvider, MemoryRecipeStore};

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{BlobError, IdentityError, StoreError};
use crate::types::{Category, Difficulty, Identity, NewRecipe, Page, Recipe, RecipeChanges, Session};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RecipeOrder {
    #[default]
    IdAsc,
    CreatedAtDesc,
}

/// A select against the recipe table. Every set field narrows the result
/// (intersection semantics).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipeQuery {
    pub ids: Option<Vec<i64>>,
    pub slug: Option<String>,
    pub exclude_slug: Option<String>,
    pub author_id: Option<Uuid>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring over title or description.
    pub search: Option<String>,
    pub order: RecipeOrder,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl RecipeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(mut self, ids: &[i64]) -> Self {
        self.ids = Some(ids.to_vec());
        self
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn exclude_slug(mut self, slug: &str) -> Self {
        self.exclude_slug = Some(slug.to_string());
        self
    }

    pub fn author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn search(mut self, search: &str) -> Self {
        let search = search.trim();
        self.search = (!search.is_empty()).then(|| search.to_string());
        self
    }

    pub fn order(mut self, order: RecipeOrder) -> Self {
        self.order = order;
        self
    }

    pub fn range(mut self, offset: i64, limit: i64) -> Self {
        self.offset = Some(offset.max(0));
        self.limit = Some(limit.max(0));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit.max(0));
        self
    }

    /// Whether a record passes every filter of this query.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.ids.as_ref().is_none_or(|ids| ids.contains(&recipe.id))
            && self.slug.as_ref().is_none_or(|s| &recipe.slug == s)
            && self.exclude_slug.as_ref().is_none_or(|s| &recipe.slug != s)
            && self.author_id.is_none_or(|a| recipe.author_id == a)
            && self.category.is_none_or(|c| recipe.categories.contains(&c))
            && self.difficulty.is_none_or(|d| recipe.difficulty == d)
            && self
                .search
                .as_deref()
                .is_none_or(|s| crate::filter::matches_search(recipe, s))
    }
}

/// Persistent record store for recipes.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Rows matching the query, ordered and ranged, plus the total number of
    /// matches before ranging.
    async fn select(&self, query: &RecipeQuery) -> Result<Page<Recipe>, StoreError>;

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError>;

    /// Replace the editable columns. `StoreError::NotFound` if the id is unknown.
    async fn update(&self, id: i64, changes: RecipeChanges) -> Result<Recipe, StoreError>;

    /// Returns whether a row was deleted.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

/// A stored blob with its content type.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBlob {
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Storage for uploaded recipe images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `path`; returns the stored path.
    async fn upload(&self, path: &str, content_type: &str, data: Vec<u8>)
        -> Result<String, BlobError>;

    async fn remove(&self, paths: &[String]) -> Result<(), BlobError>;

    async fn download(&self, path: &str) -> Result<Option<StoredBlob>, BlobError>;

    fn public_url(&self, path: &str) -> String;
}

/// Session/identity provider: registration, password sign-in and token lookup.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Identity, IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError>;

    /// The live session for a token, if any. Expired tokens yield `None`.
    async fn get_session(&self, token: &str) -> Result<Option<Session>, IdentityError>;

    async fn get_user(&self, token: &str) -> Result<Option<Identity>, IdentityError> {
        Ok(self.get_session(token).await?.map(|session| session.user))
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;
}
