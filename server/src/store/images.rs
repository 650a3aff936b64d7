use async_trait::async_trait;
use diesel::prelude::*;
use potluck_core::{BlobError, BlobStore, StoredBlob};

use crate::db::{self, DbPool};
use crate::models::NewImage;
use crate::schema::images;

/// Recipe images stored as `bytea` rows, served back through
/// `GET /api/images/{path}`.
pub struct PgBlobStore {
    pool: DbPool,
    base_url: String,
}

impl PgBlobStore {
    pub fn new(pool: DbPool, base_url: &str) -> Self {
        Self {
            pool,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for PgBlobStore {
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, BlobError> {
        let path = path.to_string();
        let content_type = content_type.to_string();

        let stored = db::run(&self.pool, move |conn| {
            let stored: String = diesel::insert_into(images::table)
                .values(&NewImage {
                    path: &path,
                    content_type: &content_type,
                    data: &data,
                })
                .returning(images::path)
                .get_result(conn)?;
            Ok(stored)
        })
        .await?;

        Ok(stored)
    }

    async fn remove(&self, paths: &[String]) -> Result<(), BlobError> {
        let paths = paths.to_vec();
        let removed = db::run(&self.pool, move |conn| {
            Ok(diesel::delete(images::table.filter(images::path.eq_any(paths))).execute(conn)?)
        })
        .await?;

        tracing::debug!(removed, "Removed recipe images");
        Ok(())
    }

    async fn download(&self, path: &str) -> Result<Option<StoredBlob>, BlobError> {
        let path = path.to_string();
        let found = db::run(&self.pool, move |conn| {
            let found: Option<(String, Vec<u8>)> = images::table
                .find(path.as_str())
                .select((images::content_type, images::data))
                .first(conn)
                .optional()?;
            Ok(found)
        })
        .await?;

        Ok(found.map(|(content_type, data)| StoredBlob { content_type, data }))
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/api/images/{}", self.base_url, path)
    }
}
