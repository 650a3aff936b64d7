//! Ownership-checked recipe mutations.
//!
//! Blob and record writes are sequential and not transactional: a failure
//! part-way through is logged and returned, never rolled back.

use std::sync::Arc;

use chrono::Utc;

use crate::error::ActionError;
use crate::image::{blob_path, blob_path_from_url, validate_image, MAX_FILE_SIZE};
use crate::slug::slugify;
use crate::store::{BlobStore, RecipeQuery, RecipeStore};
use crate::types::{Identity, ImageUpload, NewRecipe, Recipe, RecipeChanges, RecipeForm};

pub struct RecipeActions {
    recipes: Arc<dyn RecipeStore>,
    blobs: Arc<dyn BlobStore>,
    max_image_bytes: usize,
}

impl RecipeActions {
    pub fn new(recipes: Arc<dyn RecipeStore>, blobs: Arc<dyn BlobStore>) -> Self {
        RecipeActions {
            recipes,
            blobs,
            max_image_bytes: MAX_FILE_SIZE,
        }
    }

    pub fn with_max_image_bytes(mut self, max_image_bytes: usize) -> Self {
        self.max_image_bytes = max_image_bytes;
        self
    }

    pub async fn create(
        &self,
        user: Option<&Identity>,
        form: RecipeForm,
        image: Option<ImageUpload>,
    ) -> Result<Recipe, ActionError> {
        let user = user.ok_or(ActionError::Unauthenticated)?;
        let form = form.normalized().map_err(ActionError::validation)?;

        let image_url = match image {
            Some(upload) => Some(self.store_image(upload).await?),
            None => None,
        };

        let recipe = self
            .recipes
            .insert(NewRecipe {
                slug: slugify(&form.title),
                title: form.title,
                description: form.description,
                difficulty: form.difficulty,
                categories: form.categories,
                ingredients: form.ingredients,
                steps: form.steps,
                cooking_time: form.cooking_time,
                servings: form.servings,
                image: image_url,
                author_id: user.id,
                author_name: user.display_name(),
                date_added: Utc::now().date_naive(),
            })
            .await?;

        tracing::info!(recipe_id = recipe.id, author_id = %user.id, "Recipe created");
        Ok(recipe)
    }

    pub async fn update(
        &self,
        user: Option<&Identity>,
        id: i64,
        form: RecipeForm,
        image: Option<ImageUpload>,
    ) -> Result<Recipe, ActionError> {
        let user = user.ok_or(ActionError::Unauthenticated)?;
        let existing = self.fetch(id).await?;
        if existing.author_id != user.id {
            return Err(ActionError::Forbidden(
                "You can only edit your own recipes".to_string(),
            ));
        }

        let form = form.normalized().map_err(ActionError::validation)?;

        let image_url = match image {
            Some(upload) => {
                // Validate before touching the old blob.
                let content_type = self.check_image(&upload)?;
                if let Some(old) = existing.image.as_deref() {
                    self.remove_image_best_effort(old).await;
                }
                Some(self.upload(upload, &content_type).await?)
            }
            None => existing.image,
        };

        let recipe = self
            .recipes
            .update(
                id,
                RecipeChanges {
                    slug: slugify(&form.title),
                    title: form.title,
                    description: form.description,
                    difficulty: form.difficulty,
                    categories: form.categories,
                    ingredients: form.ingredients,
                    steps: form.steps,
                    cooking_time: form.cooking_time,
                    servings: form.servings,
                    image: image_url,
                },
            )
            .await?;

        tracing::info!(recipe_id = recipe.id, "Recipe updated");
        Ok(recipe)
    }

    pub async fn delete(&self, user: Option<&Identity>, id: i64) -> Result<(), ActionError> {
        let user = user.ok_or(ActionError::Unauthenticated)?;
        let existing = self.fetch(id).await?;
        if existing.author_id != user.id {
            return Err(ActionError::Forbidden(
                "You can only delete your own recipes".to_string(),
            ));
        }

        if let Some(image) = existing.image.as_deref() {
            self.remove_image_best_effort(image).await;
        }

        if !self.recipes.delete(id).await? {
            return Err(ActionError::NotFound("Recipe not found".to_string()));
        }

        tracing::info!(recipe_id = id, "Recipe deleted");
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Recipe, ActionError> {
        self.recipes
            .select(&RecipeQuery::new().ids(&[id]))
            .await?
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ActionError::NotFound("Recipe not found".to_string()))
    }

    fn check_image(&self, upload: &ImageUpload) -> Result<String, ActionError> {
        validate_image(&upload.data, self.max_image_bytes)
            .map_err(|msg| ActionError::single_field("image", msg))
    }

    async fn store_image(&self, upload: ImageUpload) -> Result<String, ActionError> {
        let content_type = self.check_image(&upload)?;
        self.upload(upload, &content_type).await
    }

    async fn upload(&self, upload: ImageUpload, content_type: &str) -> Result<String, ActionError> {
        let path = blob_path(&upload.file_name, Utc::now().timestamp_millis());
        let stored = self.blobs.upload(&path, content_type, upload.data).await?;
        Ok(self.blobs.public_url(&stored))
    }

    async fn remove_image_best_effort(&self, url: &str) {
        let Some(path) = blob_path_from_url(url) else {
            tracing::warn!(url, "Recipe image URL has no blob path");
            return;
        };

        if let Err(e) = self.blobs.remove(&[path.to_string()]).await {
            tracing::warn!(error = %e, path, "Failed to delete recipe image");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBlobStore, MemoryRecipeStore};
    use crate::types::{Category, Difficulty};
    use uuid::Uuid;

    fn cook(name: &str) -> Identity {
        Identity {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", name.to_lowercase()),
            full_name: Some(name.to_string()),
        }
    }

    fn form(title: &str) -> RecipeForm {
        RecipeForm {
            title: title.to_string(),
            description: "Creamy pasta".to_string(),
            difficulty: Difficulty::Medium,
            categories: vec![Category::Italian],
            ingredients: vec!["spaghetti".to_string(), "eggs".to_string()],
            steps: vec!["Boil".to_string(), "Toss".to_string()],
            cooking_time: "25 minutes".to_string(),
            servings: 4,
        }
    }

    fn setup() -> (Arc<MemoryRecipeStore>, Arc<MemoryBlobStore>, RecipeActions) {
        let recipes = Arc::new(MemoryRecipeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3000"));
        let actions = RecipeActions::new(recipes.clone(), blobs.clone());
        (recipes, blobs, actions)
    }

    #[tokio::test]
    async fn test_create_requires_identity() {
        let (recipes, _, actions) = setup();
        let result = actions.create(None, form("Carbonara"), None).await;
        assert_eq!(result, Err(ActionError::Unauthenticated));
        assert!(recipes.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_create_stamps_author_and_slug() {
        let (_, _, actions) = setup();
        let ada = cook("Ada");
        let recipe = actions
            .create(Some(&ada), form("Spaghetti Carbonara!"), None)
            .await
            .unwrap();
        assert_eq!(recipe.slug, "spaghetti-carbonara");
        assert_eq!(recipe.author_id, ada.id);
        assert_eq!(recipe.author_name, "Ada");
        assert_eq!(recipe.image, None);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_image_without_writing() {
        let (recipes, blobs, actions) = setup();
        let upload = ImageUpload {
            file_name: "notes.txt".to_string(),
            data: b"plain text".to_vec(),
        };
        let err = actions
            .create(Some(&cook("Ada")), form("Carbonara"), Some(upload))
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Validation { .. }));
        assert!(recipes.snapshot().is_empty());
        assert!(blobs.paths().is_empty());
    }

    #[tokio::test]
    async fn test_update_by_other_user_is_forbidden() {
        let (recipes, _, actions) = setup();
        let ada = cook("Ada");
        let created = actions
            .create(Some(&ada), form("Carbonara"), None)
            .await
            .unwrap();

        let err = actions
            .update(Some(&cook("Bob")), created.id, form("Stolen"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Forbidden(_)));
        assert_eq!(recipes.snapshot(), vec![created]);
    }

    #[tokio::test]
    async fn test_update_recomputes_slug_and_keeps_image() {
        let (recipes, _, actions) = setup();
        let ada = cook("Ada");
        let created = actions
            .create(Some(&ada), form("Carbonara"), None)
            .await
            .unwrap();
        // Seed an existing image URL directly.
        let mut changes = RecipeChanges {
            slug: created.slug.clone(),
            title: created.title.clone(),
            description: created.description.clone(),
            difficulty: created.difficulty,
            categories: created.categories.clone(),
            ingredients: created.ingredients.clone(),
            steps: created.steps.clone(),
            cooking_time: created.cooking_time.clone(),
            servings: created.servings,
            image: None,
        };
        changes.image = Some("http://localhost:3000/api/images/1-old.png".to_string());
        recipes.update(created.id, changes).await.unwrap();

        let updated = actions
            .update(Some(&ada), created.id, form("Cacio e Pepe"), None)
            .await
            .unwrap();
        assert_eq!(updated.slug, "cacio-e-pepe");
        assert_eq!(
            updated.image.as_deref(),
            Some("http://localhost:3000/api/images/1-old.png")
        );
    }

    #[tokio::test]
    async fn test_update_missing_recipe() {
        let (_, _, actions) = setup();
        let err = actions
            .update(Some(&cook("Ada")), 99, form("Carbonara"), None)
            .await
            .unwrap_err();
        assert_eq!(err, ActionError::NotFound("Recipe not found".to_string()));
    }

    #[tokio::test]
    async fn test_delete_without_image_skips_blob_removal() {
        let (recipes, blobs, actions) = setup();
        let ada = cook("Ada");
        let created = actions
            .create(Some(&ada), form("Carbonara"), None)
            .await
            .unwrap();

        actions.delete(Some(&ada), created.id).await.unwrap();
        assert!(recipes.snapshot().is_empty());
        assert!(blobs.removal_calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_forbidden() {
        let (recipes, blobs, actions) = setup();
        let created = actions
            .create(Some(&cook("Ada")), form("Carbonara"), None)
            .await
            .unwrap();

        let err = actions
            .delete(Some(&cook("Bob")), created.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::Forbidden("You can only delete your own recipes".to_string())
        );
        assert_eq!(recipes.snapshot().len(), 1);
        assert!(blobs.removal_calls().is_empty());
    }
}
