//! Category storage.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::aggregates::CategoryRecord;
use crate::Result;

/// Source of category rows, ordered by ascending `id`.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<CategoryRecord>>;
}

#[derive(Clone)]
pub struct PgCategoryRepository {
    db: PgPool,
}

impl PgCategoryRepository {
    pub fn new(db: PgPool) -> Self { Self { db } }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn fetch_all(&self) -> Result<Vec<CategoryRecord>> {
        let rows = sqlx::query_as::<_, CategoryRecord>("SELECT id, name, parent_id, source, magento_category_id FROM categories ORDER BY id ASC")
            .fetch_all(&self.db).await?;
        tracing::debug!(rows = rows.len(), "fetched categories");
        Ok(rows)
    }
}
