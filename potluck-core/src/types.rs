use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown difficulty: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub enum Category {
    Italian,
    Thai,
    Dessert,
    Vegetarian,
    Breakfast,
    Dinner,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Italian,
        Category::Thai,
        Category::Dessert,
        Category::Vegetarian,
        Category::Breakfast,
        Category::Dinner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Italian => "Italian",
            Category::Thai => "Thai",
            Category::Dessert => "Dessert",
            Category::Vegetarian => "Vegetarian",
            Category::Breakfast => "Breakfast",
            Category::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// A community-submitted recipe as stored and served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Recipe {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub categories: Vec<Category>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(rename = "cookingTime")]
    pub cooking_time: String,
    pub servings: i32,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub date_added: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Values for a recipe insert. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub categories: Vec<Category>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: String,
    pub servings: i32,
    pub image: Option<String>,
    pub author_id: Uuid,
    pub author_name: String,
    pub date_added: NaiveDate,
}

/// Full replacement of the author-editable columns of a recipe.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeChanges {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub categories: Vec<Category>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub cooking_time: String,
    pub servings: i32,
    pub image: Option<String>,
}

/// Recipe fields as submitted by an author on create or edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(rename = "cookingTime")]
    pub cooking_time: String,
    pub servings: i32,
}

/// An image file attached to a recipe form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// The authenticated user as seen by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

impl Identity {
    /// Name stamped onto recipes as `author_name`.
    pub fn display_name(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ if !self.email.is_empty() => self.email.clone(),
            _ => "Anonymous".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Identity,
    pub expires_at: DateTime<Utc>,
}

/// A page slice plus the total number of matching records.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            total: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
        assert!("Mexican".parse::<Category>().is_err());
    }

    #[test]
    fn test_difficulty_parse_is_case_sensitive() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("hard".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let mut identity = Identity {
            id: Uuid::new_v4(),
            email: "cook@example.com".to_string(),
            full_name: Some("Ada Cook".to_string()),
        };
        assert_eq!(identity.display_name(), "Ada Cook");

        identity.full_name = Some("  ".to_string());
        assert_eq!(identity.display_name(), "cook@example.com");

        identity.email.clear();
        assert_eq!(identity.display_name(), "Anonymous");
    }

    #[test]
    fn test_recipe_json_uses_camel_case_cooking_time() {
        let form: RecipeForm = serde_json::from_str(
            r#"{"title":"Pad Thai","description":"Noodles","difficulty":"Medium",
                "categories":["Thai","Dinner"],"ingredients":["noodles"],"steps":["cook"],
                "cookingTime":"30 minutes","servings":2}"#,
        )
        .unwrap();
        assert_eq!(form.cooking_time, "30 minutes");
        assert_eq!(form.categories, vec![Category::Thai, Category::Dinner]);
    }
}
