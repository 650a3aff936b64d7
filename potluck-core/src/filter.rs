//! Search, filter and pagination state for the recipe explorer.
//!
//! The same value is parsed from request query parameters on the server and
//! held as client state by callers that drive the explorer.

use crate::error::FieldErrors;
use crate::types::{Category, Difficulty, Recipe};

pub const DEFAULT_PAGE_SIZE: i64 = 9;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Value meaning "no filter" for difficulty and category selectors.
pub const ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub search: String,
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
    pub page: i64,
    pub limit: i64,
}

impl Default for RecipeFilter {
    fn default() -> Self {
        RecipeFilter {
            search: String::new(),
            difficulty: None,
            category: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

fn parse_choice<T: std::str::FromStr>(
    raw: Option<&str>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<T> {
    match raw.map(str::trim) {
        None | Some("") | Some(ALL) => None,
        Some(value) => match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(format!("Unknown {}: {}", field, value));
                None
            }
        },
    }
}

impl RecipeFilter {
    /// Build a filter from raw query parameters. `"all"` and empty values mean
    /// no filter; out-of-range pages and limits are clamped.
    pub fn from_params(
        search: Option<&str>,
        difficulty: Option<&str>,
        category: Option<&str>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let difficulty = parse_choice(difficulty, "difficulty", &mut errors);
        let category = parse_choice(category, "category", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(RecipeFilter {
            search: search.map(str::trim).unwrap_or_default().to_string(),
            difficulty,
            category,
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        })
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 1;
    }

    pub fn set_difficulty(&mut self, difficulty: Option<Difficulty>) {
        self.difficulty = difficulty;
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: i64) {
        self.page = page.max(1);
    }

    /// Rows to skip before this page. Saturates for pages past any real
    /// result set so they come back empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.limit - 1) / self.limit
        }
    }

    /// Query parameters for this state, omitting defaults (page only when > 1).
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let search = self.search.trim();
        if !search.is_empty() {
            pairs.push(("search", search.to_string()));
        }
        if let Some(difficulty) = self.difficulty {
            pairs.push(("difficulty", difficulty.to_string()));
        }
        if let Some(category) = self.category {
            pairs.push(("category", category.to_string()));
        }
        if self.page > 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.limit != DEFAULT_PAGE_SIZE {
            pairs.push(("limit", self.limit.to_string()));
        }
        pairs
    }

    /// Whether a recipe satisfies every active filter (pagination aside).
    pub fn matches(&self, recipe: &Recipe) -> bool {
        matches_search(recipe, &self.search)
            && self.difficulty.is_none_or(|d| recipe.difficulty == d)
            && self
                .category
                .is_none_or(|c| recipe.categories.contains(&c))
    }
}

/// Case-insensitive substring match on title or description.
pub fn matches_search(recipe: &Recipe, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty()
        || recipe.title.to_lowercase().contains(&needle)
        || recipe.description.to_lowercase().contains(&needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_means_no_filter() {
        let filter =
            RecipeFilter::from_params(Some(""), Some("all"), Some("all"), None, None).unwrap();
        assert_eq!(filter, RecipeFilter::default());
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let errors =
            RecipeFilter::from_params(None, None, Some("Mexican"), None, None).unwrap_err();
        assert_eq!(errors["category"], vec!["Unknown category: Mexican"]);
    }

    #[test]
    fn test_page_and_limit_are_clamped() {
        let filter = RecipeFilter::from_params(None, None, None, Some(0), Some(5000)).unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_changing_filters_resets_page() {
        let mut filter = RecipeFilter::default();
        filter.set_page(4);
        filter.set_category(Some(Category::Dessert));
        assert_eq!(filter.page, 1);

        filter.set_page(3);
        filter.set_search("cake");
        assert_eq!(filter.page, 1);

        filter.set_page(2);
        filter.set_difficulty(Some(Difficulty::Easy));
        assert_eq!(filter.page, 1);
    }

    #[test]
    fn test_query_pairs_omit_defaults() {
        let mut filter = RecipeFilter::default();
        assert!(filter.query_pairs().is_empty());

        filter.set_search("curry");
        filter.set_category(Some(Category::Thai));
        filter.set_page(2);
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("search", "curry".to_string()),
                ("category", "Thai".to_string()),
                ("page", "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_offset_and_total_pages() {
        let mut filter = RecipeFilter::default();
        filter.set_page(3);
        assert_eq!(filter.offset(), 18);
        assert_eq!(filter.total_pages(0), 0);
        assert_eq!(filter.total_pages(9), 1);
        assert_eq!(filter.total_pages(10), 2);
    }

    #[test]
    fn test_huge_page_offset_saturates() {
        let filter = RecipeFilter::from_params(None, None, None, Some(i64::MAX), None).unwrap();
        assert_eq!(filter.page, i64::MAX);
        assert_eq!(filter.offset(), i64::MAX);

        let filter =
            RecipeFilter::from_params(None, None, None, Some(i64::MAX / 2), Some(MAX_PAGE_SIZE))
                .unwrap();
        assert_eq!(filter.offset(), i64::MAX);
    }
}
