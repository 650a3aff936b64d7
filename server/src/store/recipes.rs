use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use potluck_core::{
    NewRecipe, Page, Recipe, RecipeChanges, RecipeOrder, RecipeQuery, RecipeStore, StoreError,
};

use crate::db::{self, DbError, DbPool};
use crate::models::{NewRecipeRow, RecipeChangeset, RecipeRow};
use crate::raw_sql::{count_over, escape_like};
use crate::schema::recipes;

/// Recipes in Postgres.
pub struct PgRecipeStore {
    pool: DbPool,
}

impl PgRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// The WHERE clause for a query, without ordering or ranging.
fn filtered(query: &RecipeQuery) -> recipes::BoxedQuery<'static, Pg> {
    let mut q = recipes::table.into_boxed();

    if let Some(ids) = &query.ids {
        q = q.filter(recipes::id.eq_any(ids.clone()));
    }
    if let Some(slug) = &query.slug {
        q = q.filter(recipes::slug.eq(slug.clone()));
    }
    if let Some(slug) = &query.exclude_slug {
        q = q.filter(recipes::slug.ne(slug.clone()));
    }
    if let Some(author_id) = query.author_id {
        q = q.filter(recipes::author_id.eq(author_id));
    }
    if let Some(category) = query.category {
        q = q.filter(recipes::categories.contains(vec![category.as_str().to_string()]));
    }
    if let Some(difficulty) = query.difficulty {
        q = q.filter(recipes::difficulty.eq(difficulty.as_str()));
    }
    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        q = q.filter(
            recipes::title
                .ilike(pattern.clone())
                .or(recipes::description.ilike(pattern)),
        );
    }

    q
}

fn to_recipes(rows: Vec<RecipeRow>) -> Result<Vec<Recipe>, StoreError> {
    rows.into_iter().map(Recipe::try_from).collect()
}

#[async_trait]
impl RecipeStore for PgRecipeStore {
    async fn select(&self, query: &RecipeQuery) -> Result<Page<Recipe>, StoreError> {
        let query = query.clone();

        let (rows, total) = db::run(&self.pool, move |conn| {
            let mut q = filtered(&query);
            q = match query.order {
                RecipeOrder::IdAsc => q.order(recipes::id.asc()),
                RecipeOrder::CreatedAtDesc => {
                    q.order((recipes::created_at.desc(), recipes::id.desc()))
                }
            };
            if let Some(offset) = query.offset {
                q = q.offset(offset);
            }
            if let Some(limit) = query.limit {
                q = q.limit(limit);
            }

            let results: Vec<(RecipeRow, i64)> = q
                .select((RecipeRow::as_select(), count_over()))
                .load(conn)?;

            let total = match results.first() {
                Some((_, total)) => *total,
                // Past the last page the window count has no row to ride on.
                None if query.offset.unwrap_or(0) > 0 => {
                    filtered(&query).count().get_result(conn)?
                }
                None => 0,
            };

            let rows = results.into_iter().map(|(row, _)| row).collect::<Vec<_>>();
            Ok::<_, DbError>((rows, total))
        })
        .await?;

        Ok(Page {
            items: to_recipes(rows)?,
            total,
        })
    }

    async fn insert(&self, recipe: NewRecipe) -> Result<Recipe, StoreError> {
        let row = db::run(&self.pool, move |conn| {
            let row = diesel::insert_into(recipes::table)
                .values(NewRecipeRow::from(&recipe))
                .returning(RecipeRow::as_returning())
                .get_result(conn)?;
            Ok(row)
        })
        .await?;

        Recipe::try_from(row)
    }

    async fn update(&self, id: i64, changes: RecipeChanges) -> Result<Recipe, StoreError> {
        let row = db::run(&self.pool, move |conn| {
            let row = diesel::update(recipes::table.find(id))
                .set(RecipeChangeset::from(&changes))
                .returning(RecipeRow::as_returning())
                .get_result(conn)?;
            Ok(row)
        })
        .await?;

        Recipe::try_from(row)
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let deleted = db::run(&self.pool, move |conn| {
            Ok(diesel::delete(recipes::table.find(id)).execute(conn)?)
        })
        .await?;

        Ok(deleted > 0)
    }
}
