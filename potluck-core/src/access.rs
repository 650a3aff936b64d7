//! Read-side queries over the recipe store.
//!
//! Reads never fail: backend errors are logged and surface as an empty
//! result (or `None` for single lookups).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::filter::RecipeFilter;
use crate::store::{RecipeOrder, RecipeQuery, RecipeStore};
use crate::types::{Category, Identity, Page, Recipe};

pub const DEFAULT_RELATED_LIMIT: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Lookup {
    Id(i64),
    Slug(String),
}

/// Query facade over a [`RecipeStore`].
///
/// Single-record lookups are memoized for the lifetime of the value, so build
/// one per request.
pub struct RecipeAccess {
    store: Arc<dyn RecipeStore>,
    memo: Mutex<HashMap<Lookup, Option<Recipe>>>,
}

impl RecipeAccess {
    pub fn new(store: Arc<dyn RecipeStore>) -> Self {
        RecipeAccess {
            store,
            memo: Mutex::new(HashMap::new()),
        }
    }

    async fn select(&self, query: RecipeQuery, what: &str) -> Page<Recipe> {
        match self.store.select(&query).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(error = %e, query = what, "Failed to fetch recipes");
                Page::empty()
            }
        }
    }

    async fn lookup(&self, key: Lookup) -> Option<Recipe> {
        let cached = self
            .memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(hit) = cached {
            return hit;
        }

        let query = match &key {
            Lookup::Id(id) => RecipeQuery::new().ids(&[*id]),
            Lookup::Slug(slug) => RecipeQuery::new().slug(slug),
        };

        let found = match self.store.select(&query).await {
            Ok(page) => {
                if page.items.len() > 1 {
                    tracing::warn!(
                        lookup = ?key,
                        matches = page.items.len(),
                        "Ambiguous recipe lookup, using the lowest id"
                    );
                }
                page.items.into_iter().min_by_key(|r| r.id)
            }
            Err(e) => {
                // Errors are not memoized so a retry in the same request can succeed.
                tracing::error!(error = %e, lookup = ?key, "Failed to fetch recipe");
                return None;
            }
        };

        self.memo
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, found.clone());
        found
    }

    /// Every recipe, ordered by id.
    pub async fn get_all(&self) -> Vec<Recipe> {
        self.select(RecipeQuery::new(), "all").await.items
    }

    pub async fn get_by_slug(&self, slug: &str) -> Option<Recipe> {
        self.lookup(Lookup::Slug(slug.to_string())).await
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Recipe> {
        self.lookup(Lookup::Id(id)).await
    }

    pub async fn get_by_ids(&self, ids: &[i64]) -> Vec<Recipe> {
        if ids.is_empty() {
            return Vec::new();
        }
        self.select(RecipeQuery::new().ids(ids), "ids").await.items
    }

    pub async fn get_by_category(&self, category: Category) -> Vec<Recipe> {
        self.select(RecipeQuery::new().category(category), "category")
            .await
            .items
    }

    /// Recipes authored by `user`, newest first. No user, no recipes.
    pub async fn get_by_author(&self, user: Option<&Identity>) -> Vec<Recipe> {
        let Some(user) = user else {
            return Vec::new();
        };
        let query = RecipeQuery::new()
            .author(user.id)
            .order(RecipeOrder::CreatedAtDesc);
        self.select(query, "author").await.items
    }

    /// Up to `limit` other recipes sharing `category`.
    pub async fn get_related(
        &self,
        category: Category,
        exclude_slug: &str,
        limit: i64,
    ) -> Vec<Recipe> {
        let query = RecipeQuery::new()
            .category(category)
            .exclude_slug(exclude_slug)
            .limit(limit);
        self.select(query, "related").await.items
    }

    /// One page of recipes matching the filter, plus the total match count.
    pub async fn get_filtered(&self, filter: &RecipeFilter) -> Page<Recipe> {
        let mut query = RecipeQuery::new()
            .search(&filter.search)
            .range(filter.offset(), filter.limit);
        if let Some(difficulty) = filter.difficulty {
            query = query.difficulty(difficulty);
        }
        if let Some(category) = filter.category {
            query = query.category(category);
        }
        self.select(query, "filtered").await
    }
}
