//! End-to-end flows through the access layer and mutation actions against
//! the in-memory collaborators.

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, RgbImage};
use potluck_core::{
    ActionError, BlobStore, Category, Difficulty, Identity, ImageUpload, MemoryBlobStore,
    MemoryRecipeStore, RecipeAccess, RecipeActions, RecipeFilter, RecipeForm,
};
use uuid::Uuid;

struct Harness {
    recipes: Arc<MemoryRecipeStore>,
    blobs: Arc<MemoryBlobStore>,
    actions: RecipeActions,
}

impl Harness {
    fn new() -> Self {
        let recipes = Arc::new(MemoryRecipeStore::new());
        let blobs = Arc::new(MemoryBlobStore::new("http://localhost:3000"));
        let actions = RecipeActions::new(recipes.clone(), blobs.clone());
        Harness {
            recipes,
            blobs,
            actions,
        }
    }

    fn access(&self) -> RecipeAccess {
        RecipeAccess::new(self.recipes.clone())
    }

    async fn add(
        &self,
        user: &Identity,
        title: &str,
        description: &str,
        difficulty: Difficulty,
        categories: &[Category],
    ) -> i64 {
        let form = RecipeForm {
            title: title.to_string(),
            description: description.to_string(),
            difficulty,
            categories: categories.to_vec(),
            ingredients: vec!["something".to_string()],
            steps: vec!["cook it".to_string()],
            cooking_time: "30 minutes".to_string(),
            servings: 2,
        };
        self.actions.create(Some(user), form, None).await.unwrap().id
    }
}

fn user(name: &str) -> Identity {
    Identity {
        id: Uuid::new_v4(),
        email: format!("{}@example.com", name.to_lowercase()),
        full_name: Some(name.to_string()),
    }
}

fn png(name: &str) -> ImageUpload {
    let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    ImageUpload {
        file_name: name.to_string(),
        data: buf.into_inner(),
    }
}

fn simple_form(title: &str) -> RecipeForm {
    RecipeForm {
        title: title.to_string(),
        description: "A dish".to_string(),
        difficulty: Difficulty::Easy,
        categories: vec![Category::Dinner],
        ingredients: vec!["salt".to_string()],
        steps: vec!["season".to_string()],
        cooking_time: "5 minutes".to_string(),
        servings: 1,
    }
}

async fn seed_catalog(h: &Harness, cook: &Identity) {
    h.add(cook, "Garden Lasagna", "Layers of vegetables", Difficulty::Medium, &[Category::Italian, Category::Vegetarian]).await;
    h.add(cook, "Green Curry", "Spicy and vegetable packed", Difficulty::Medium, &[Category::Thai, Category::Vegetarian]).await;
    h.add(cook, "Beef Ragu", "Slow cooked sauce", Difficulty::Hard, &[Category::Italian, Category::Dinner]).await;
    h.add(cook, "Veggie Omelette", "Quick vegetable breakfast", Difficulty::Easy, &[Category::Breakfast, Category::Vegetarian]).await;
    h.add(cook, "Tiramisu", "Coffee dessert", Difficulty::Medium, &[Category::Italian, Category::Dessert]).await;
}

#[tokio::test]
async fn test_category_filter_returns_only_matching_recipes() {
    let h = Harness::new();
    seed_catalog(&h, &user("Ada")).await;

    let mut filter = RecipeFilter::default();
    filter.set_category(Some(Category::Vegetarian));
    let page = h.access().get_filtered(&filter).await;

    assert_eq!(page.total, 3);
    assert!(page
        .items
        .iter()
        .all(|r| r.categories.contains(&Category::Vegetarian)));
    assert_eq!(h.access().get_by_category(Category::Vegetarian).await, page.items);
}

#[tokio::test]
async fn test_search_difficulty_and_category_intersect() {
    let h = Harness::new();
    seed_catalog(&h, &user("Ada")).await;

    let filter = RecipeFilter::from_params(
        Some("VEGETABLE"),
        Some("Medium"),
        Some("Vegetarian"),
        None,
        None,
    )
    .unwrap();
    let page = h.access().get_filtered(&filter).await;

    let titles: Vec<_> = page.items.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Garden Lasagna", "Green Curry"]);
    assert_eq!(page.total, 2);
    for recipe in &page.items {
        assert!(filter.matches(recipe));
    }
}

#[tokio::test]
async fn test_pagination_reports_total_across_pages() {
    let h = Harness::new();
    let cook = user("Ada");
    for i in 0..11 {
        h.add(&cook, &format!("Pie {}", i), "Flaky", Difficulty::Easy, &[Category::Dessert]).await;
    }

    let mut filter = RecipeFilter::default();
    filter.set_page(2);
    let page = h.access().get_filtered(&filter).await;
    assert_eq!(page.total, 11);
    assert_eq!(filter.total_pages(page.total), 2);
    assert_eq!(page.items.iter().map(|r| r.id).collect::<Vec<_>>(), vec![10, 11]);
}

#[tokio::test]
async fn test_my_recipes_are_newest_first_and_scoped_to_author() {
    let h = Harness::new();
    let ada = user("Ada");
    let bob = user("Bob");
    let first = h.add(&ada, "Soup", "Warm", Difficulty::Easy, &[Category::Dinner]).await;
    h.add(&bob, "Salad", "Cold", Difficulty::Easy, &[Category::Vegetarian]).await;
    let second = h.add(&ada, "Stew", "Hearty", Difficulty::Easy, &[Category::Dinner]).await;

    let mine = h.access().get_by_author(Some(&ada)).await;
    assert_eq!(mine.iter().map(|r| r.id).collect::<Vec<_>>(), vec![second, first]);
    assert!(h.access().get_by_author(None).await.is_empty());
}

#[tokio::test]
async fn test_foreign_mutations_leave_record_and_blobs_untouched() {
    let h = Harness::new();
    let ada = user("Ada");
    let recipe = h
        .actions
        .create(Some(&ada), simple_form("Toast"), Some(png("toast.png")))
        .await
        .unwrap();
    let blobs_before = h.blobs.paths();
    let records_before = h.recipes.snapshot();

    let mallory = user("Mallory");
    let update = h
        .actions
        .update(Some(&mallory), recipe.id, simple_form("Burnt"), Some(png("x.png")))
        .await;
    assert!(matches!(update, Err(ActionError::Forbidden(_))));

    let delete = h.actions.delete(Some(&mallory), recipe.id).await;
    assert!(matches!(delete, Err(ActionError::Forbidden(_))));

    assert_eq!(h.recipes.snapshot(), records_before);
    assert_eq!(h.blobs.paths(), blobs_before);
    assert!(h.blobs.removal_calls().is_empty());
}

#[tokio::test]
async fn test_image_lifecycle_follows_the_record() {
    let h = Harness::new();
    let ada = user("Ada");

    let created = h
        .actions
        .create(Some(&ada), simple_form("Toast"), Some(png("my toast.png")))
        .await
        .unwrap();
    let url = created.image.clone().unwrap();
    assert!(url.starts_with("http://localhost:3000/api/images/"));
    assert!(url.ends_with("-my-toast.png"));
    let old_path = url.rsplit('/').next().unwrap().to_string();
    assert_eq!(h.blobs.paths(), vec![old_path.clone()]);

    let blob = h.blobs.download(&old_path).await.unwrap().unwrap();
    assert_eq!(blob.content_type, "image/png");

    let updated = h
        .actions
        .update(Some(&ada), created.id, simple_form("Toast"), Some(png("new.png")))
        .await
        .unwrap();
    assert_ne!(updated.image, created.image);
    assert_eq!(h.blobs.removal_calls(), vec![vec![old_path]]);
    assert_eq!(h.blobs.paths().len(), 1);

    h.actions.delete(Some(&ada), created.id).await.unwrap();
    assert!(h.blobs.paths().is_empty());
    assert!(h.recipes.snapshot().is_empty());
}

#[tokio::test]
async fn test_failed_blob_removal_does_not_block_delete() {
    let h = Harness::new();
    let ada = user("Ada");
    let created = h
        .actions
        .create(Some(&ada), simple_form("Toast"), Some(png("toast.png")))
        .await
        .unwrap();

    h.blobs.set_fail_removals(true);
    h.actions.delete(Some(&ada), created.id).await.unwrap();

    assert!(h.recipes.snapshot().is_empty());
    assert_eq!(h.blobs.removal_calls().len(), 1);
}

#[tokio::test]
async fn test_failed_blob_removal_does_not_block_image_replacement() {
    let h = Harness::new();
    let ada = user("Ada");
    let created = h
        .actions
        .create(Some(&ada), simple_form("Toast"), Some(png("toast.png")))
        .await
        .unwrap();
    let old_url = created.image.clone().unwrap();

    h.blobs.set_fail_removals(true);
    let updated = h
        .actions
        .update(Some(&ada), created.id, simple_form("Toast"), Some(png("fresh.png")))
        .await
        .unwrap();

    let new_url = updated.image.clone().unwrap();
    assert_ne!(new_url, old_url);
    assert!(new_url.ends_with("-fresh.png"));
    assert_eq!(h.recipes.snapshot()[0].image, Some(new_url));
    assert_eq!(h.blobs.removal_calls().len(), 1);
    // The old blob is orphaned rather than failing the update.
    assert_eq!(h.blobs.paths().len(), 2);
}

#[tokio::test]
async fn test_failed_upload_aborts_create() {
    let h = Harness::new();
    h.blobs.set_fail_uploads(true);

    let err = h
        .actions
        .create(Some(&user("Ada")), simple_form("Toast"), Some(png("toast.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Upstream(_)));
    assert!(h.recipes.snapshot().is_empty());
}

#[tokio::test]
async fn test_oversized_image_is_a_field_error() {
    let h = Harness::new();
    let actions = RecipeActions::new(h.recipes.clone(), h.blobs.clone()).with_max_image_bytes(10);

    let err = actions
        .create(Some(&user("Ada")), simple_form("Toast"), Some(png("toast.png")))
        .await
        .unwrap_err();
    match err {
        ActionError::Validation { field_errors, .. } => {
            assert!(field_errors["image"][0].starts_with("Image size must be less than"));
        }
        other => panic!("unexpected {:?}", other),
    }
}
