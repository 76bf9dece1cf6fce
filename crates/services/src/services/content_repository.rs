//! Storage seam for content records.

use async_trait::async_trait;
use db::models::{
    content::{ContentRecord, NewContent},
    content_kind::ContentKind,
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Persists records to the entity of their kind and reads them back
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Insert into the kind's entity only; returns the bare row.
    async fn create(&self, record: &NewContent) -> Result<ContentRecord, sqlx::Error>;

    /// Row joined with its author profile and engagement.
    async fn fetch_with_author(
        &self,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<ContentRecord>, sqlx::Error>;

    async fn list_with_author(
        &self,
        kind: ContentKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentRecord>, sqlx::Error>;

    async fn author_of(&self, kind: ContentKind, id: &str) -> Result<Option<String>, sqlx::Error>;

    async fn update(
        &self,
        id: &str,
        record: &NewContent,
    ) -> Result<Option<ContentRecord>, sqlx::Error>;

    async fn delete(&self, kind: ContentKind, id: &str) -> Result<u64, sqlx::Error>;

    async fn record_view(&self, kind: ContentKind, id: &str) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct SqliteContentRepository {
    pool: SqlitePool,
}

impl SqliteContentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentRepository for SqliteContentRepository {
    async fn create(&self, record: &NewContent) -> Result<ContentRecord, sqlx::Error> {
        ContentRecord::create(&self.pool, Uuid::new_v4(), record).await
    }

    async fn fetch_with_author(
        &self,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<ContentRecord>, sqlx::Error> {
        ContentRecord::find_with_author(&self.pool, kind, id).await
    }

    async fn list_with_author(
        &self,
        kind: ContentKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContentRecord>, sqlx::Error> {
        ContentRecord::list_with_author(&self.pool, kind, limit, offset).await
    }

    async fn author_of(&self, kind: ContentKind, id: &str) -> Result<Option<String>, sqlx::Error> {
        ContentRecord::author_of(&self.pool, kind, id).await
    }

    async fn update(
        &self,
        id: &str,
        record: &NewContent,
    ) -> Result<Option<ContentRecord>, sqlx::Error> {
        ContentRecord::update(&self.pool, id, record).await
    }

    async fn delete(&self, kind: ContentKind, id: &str) -> Result<u64, sqlx::Error> {
        ContentRecord::delete(&self.pool, kind, id).await
    }

    async fn record_view(&self, kind: ContentKind, id: &str) -> Result<(), sqlx::Error> {
        ContentRecord::record_view(&self.pool, kind, id).await
    }
}
