//! In-memory collaborators.
//!
//! Each one can be told to fail so callers' error paths can be exercised
//! without a database.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{BlobStore, IdentityProvider, RecipeOrder, RecipeQuery, RecipeStore, StoredBlob};
use crate::error::{BlobError, IdentityError, StoreError};
use crate::types::{Identity, NewRecipe, Page, Recipe, RecipeChanges, Session};

#[derive(Debug, Default)]
struct RecipeTable {
    next_id: i64,
    rows: BTreeMap<i64, Recipe>,
}

#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    table: RwLock<RecipeTable>,
    failing: AtomicBool,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a backend error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All rows, ordered by id.
    pub fn snapshot(&self) -> Vec<Recipe> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.rows.values().cloned().collect()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Backend("memory store set to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecipeStore for MemoryRecipeStore {
    async fn select(&self, query: &RecipeQuery) -> Result<Page<Recipe>, StoreError> {
        self.check()?;
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);

        let mut matching: Vec<Recipe> = table
            .rows
            .values()
            .filter(|recipe| query.matches(recipe))
            .cloned()
            .collect();

        if query.order == RecipeOrder::CreatedAtDesc {
            matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }

        let total = matching.len() as i64;
        let offset = query.offset.unwrap_or(0).max(0) as usize;
        let items = match query.limit {
            Some(limit) => matching
                .into_iter()
                .skip(offset)
                .take(limit.max(0) as usize)
                .collect(),
            None => matching.into_iter().skip(offset).collect(),
        };

        Ok(Page { items, total })
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        self.check()?;
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.next_id += 1;

        let row = Recipe {
            id: table.next_id,
            slug: recipe.slug,
            title: recipe.title,
            description: recipe.description,
            difficulty: recipe.difficulty,
            categories: recipe.categories,
            ingredients: recipe.ingredients,
            steps: recipe.steps,
            cooking_time: recipe.cooking_time,
            servings: recipe.servings,
            image: recipe.image,
            author_id: recipe.author_id,
            author_name: recipe.author_name,
            date_added: recipe.date_added,
            created_at: Utc::now(),
        };
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: i64, changes: RecipeChanges) -> Result<Recipe, StoreError> {
        self.check()?;
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let row = table.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        row.slug = changes.slug;
        row.title = changes.title;
        row.description = changes.description;
        row.difficulty = changes.difficulty;
        row.categories = changes.categories;
        row.ingredients = changes.ingredients;
        row.steps = changes.steps;
        row.cooking_time = changes.cooking_time;
        row.servings = changes.servings;
        row.image = changes.image;

        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.check()?;
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        Ok(table.rows.remove(&id).is_some())
    }
}

#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    blobs: RwLock<HashMap<String, StoredBlob>>,
    removals: Mutex<Vec<Vec<String>>>,
    fail_uploads: AtomicBool,
    fail_removals: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        MemoryBlobStore {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blobs: RwLock::new(HashMap::new()),
            removals: Mutex::new(Vec::new()),
            fail_uploads: AtomicBool::new(false),
            fail_removals: AtomicBool::new(false),
        }
    }

    pub fn set_fail_uploads(&self, failing: bool) {
        self.fail_uploads.store(failing, Ordering::SeqCst);
    }

    pub fn set_fail_removals(&self, failing: bool) {
        self.fail_removals.store(failing, Ordering::SeqCst);
    }

    /// Every `remove` call received, including failed ones.
    pub fn removal_calls(&self) -> Vec<Vec<String>> {
        self.removals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .blobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, BlobError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(BlobError::Backend("memory blob store set to fail".to_string()));
        }

        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        blobs.insert(
            path.to_string(),
            StoredBlob {
                content_type: content_type.to_string(),
                data,
            },
        );
        Ok(path.to_string())
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BlobError> {
        self.removals
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(paths.to_vec());

        if self.fail_removals.load(Ordering::SeqCst) {
            return Err(BlobError::Backend("memory blob store set to fail".to_string()));
        }

        let mut blobs = self.blobs.write().unwrap_or_else(PoisonError::into_inner);
        for path in paths {
            blobs.remove(path);
        }
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Option<StoredBlob>, BlobError> {
        let blobs = self.blobs.read().unwrap_or_else(PoisonError::into_inner);
        Ok(blobs.get(path).cloned())
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/api/images/{}", self.base_url, path)
    }
}

#[derive(Debug)]
struct Account {
    identity: Identity,
    password: String,
}

#[derive(Debug)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<String, Session>>,
    session_ttl: Duration,
}

impl Default for MemoryIdentityProvider {
    fn default() -> Self {
        MemoryIdentityProvider {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            session_ttl: Duration::days(30),
        }
    }
}

impl MemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<Identity, IdentityError> {
        let email = email.trim().to_lowercase();
        let mut accounts = self.accounts.write().unwrap_or_else(PoisonError::into_inner);
        if accounts.contains_key(&email) {
            return Err(IdentityError::AlreadyRegistered);
        }

        let identity = Identity {
            id: Uuid::new_v4(),
            email: email.clone(),
            full_name: Some(full_name.trim().to_string()).filter(|n| !n.is_empty()),
        };
        accounts.insert(
            email,
            Account {
                identity: identity.clone(),
                password: password.to_string(),
            },
        );
        Ok(identity)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, IdentityError> {
        let email = email.trim().to_lowercase();
        let identity = {
            let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
            match accounts.get(&email) {
                Some(account) if account.password == password => account.identity.clone(),
                _ => return Err(IdentityError::InvalidCredentials),
            }
        };

        let session = Session {
            token: Uuid::new_v4().simple().to_string(),
            user: identity,
            expires_at: Utc::now() + self.session_ttl,
        };
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, IdentityError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        Ok(sessions
            .get(token)
            .filter(|session| session.expires_at > Utc::now())
            .cloned())
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
        Ok(())
    }
}
