use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use potluck_core::{Category, Identity, NewRecipe, Recipe, RecipeChanges, StoreError};
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for Identity {
    fn from(user: User) -> Self {
        Identity {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::sessions)]
pub struct NewSession<'a> {
    pub user_id: Uuid,
    pub token_hash: &'a str,
    pub expires_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub categories: Vec<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: String,
    pub servings: i32,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub date_added: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = StoreError;

    fn try_from(row: RecipeRow) -> Result<Self, Self::Error> {
        let difficulty = row.difficulty.parse().map_err(StoreError::InvalidRecord)?;
        let categories = row
            .categories
            .iter()
            .map(|c| c.parse::<Category>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::InvalidRecord)?;

        Ok(Recipe {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            difficulty,
            categories,
            ingredients: row.ingredients,
            steps: row.steps,
            cooking_time: row.cooking_time,
            servings: row.servings,
            image: row.image,
            author_id: row.author_id,
            author_name: row.author_name,
            date_added: row.date_added,
            created_at: row.created_at,
        })
    }
}

fn category_names(categories: &[Category]) -> Vec<String> {
    categories.iter().map(|c| c.as_str().to_string()).collect()
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub difficulty: &'a str,
    pub categories: Vec<String>,
    pub ingredients: &'a [String],
    pub steps: &'a [String],
    pub cooking_time: &'a str,
    pub servings: i32,
    pub image: Option<&'a str>,
    pub author_id: Uuid,
    pub author_name: &'a str,
    pub date_added: NaiveDate,
}

impl<'a> From<&'a NewRecipe> for NewRecipeRow<'a> {
    fn from(recipe: &'a NewRecipe) -> Self {
        NewRecipeRow {
            slug: &recipe.slug,
            title: &recipe.title,
            description: &recipe.description,
            difficulty: recipe.difficulty.as_str(),
            categories: category_names(&recipe.categories),
            ingredients: &recipe.ingredients,
            steps: &recipe.steps,
            cooking_time: &recipe.cooking_time,
            servings: recipe.servings,
            image: recipe.image.as_deref(),
            author_id: recipe.author_id,
            author_name: &recipe.author_name,
            date_added: recipe.date_added,
        }
    }
}

/// Full replacement of the editable columns; a `None` image clears it.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(treat_none_as_null = true)]
pub struct RecipeChangeset<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub difficulty: &'a str,
    pub categories: Vec<String>,
    pub ingredients: &'a [String],
    pub steps: &'a [String],
    pub cooking_time: &'a str,
    pub servings: i32,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a RecipeChanges> for RecipeChangeset<'a> {
    fn from(changes: &'a RecipeChanges) -> Self {
        RecipeChangeset {
            slug: &changes.slug,
            title: &changes.title,
            description: &changes.description,
            difficulty: changes.difficulty.as_str(),
            categories: category_names(&changes.categories),
            ingredients: &changes.ingredients,
            steps: &changes.steps,
            cooking_time: &changes.cooking_time,
            servings: changes.servings,
            image: changes.image.as_deref(),
        }
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::images)]
pub struct NewImage<'a> {
    pub path: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}
