//! Content pipeline: type check, field check, coercion, persistence and
//! the author-joined read-back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use db::models::{
    content::{ContentRecord, NewContent},
    content_kind::ContentKind,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;

use super::{
    content_coercion::{apply_category_override, coerce},
    content_registry,
    content_repository::ContentRepository,
    content_validation::{Rejection, messages, validate_fields, validate_type},
    raw_content::RawContent,
    storage_errors::{StorageFailure, translate},
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionOptions {
    /// Force the fixed category of video, question and truth entries
    pub apply_category_overrides: bool,
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            apply_category_overrides: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct IngestionMetadata {
    pub content_type: ContentKind,
    pub content_id: String,
    pub author_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedContent {
    pub record: ContentRecord,
    pub metadata: IngestionMetadata,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    Created(CreatedContent),
    Rejected(Rejection),
    Failed(StorageFailure),
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("content not found")]
    NotFound,
    #[error("content belongs to another user")]
    Forbidden,
    #[error("storage failure: {}", .0.message)]
    Storage(StorageFailure),
}

impl From<sqlx::Error> for ContentError {
    fn from(err: sqlx::Error) -> Self {
        ContentError::Storage(translate(&err))
    }
}

/// Entry point for every content write and read
#[derive(Clone)]
pub struct ContentIngestion {
    repository: Arc<dyn ContentRepository>,
    options: IngestionOptions,
}

impl ContentIngestion {
    pub fn new(repository: Arc<dyn ContentRepository>, options: IngestionOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// Validate, store and read back one submission.
    ///
    /// Stops at the first failing stage. A failed read-back after a
    /// successful insert is not an error: the bare stored row is returned.
    pub async fn ingest(&self, tag: &str, raw: Value, actor_id: &str) -> IngestOutcome {
        let kind = match validate_type(tag) {
            Ok(kind) => kind,
            Err(rejection) => {
                debug!(content_type = tag, "Rejected unknown content type");
                return IngestOutcome::Rejected(rejection);
            }
        };

        let record = match self.prepare(kind, raw, actor_id) {
            Ok(record) => record,
            Err(rejection) => {
                debug!(content_type = %kind, error = %rejection, "Rejected content fields");
                return IngestOutcome::Rejected(rejection);
            }
        };

        let stored = match self.repository.create(&record).await {
            Ok(stored) => stored,
            Err(err) => return IngestOutcome::Failed(translate(&err)),
        };
        let content_id = stored.id().unwrap_or_default().to_string();
        info!(
            content_type = %kind,
            content_id = %content_id,
            author_id = actor_id,
            "Content created"
        );

        let record = self.rehydrate(kind, &content_id, stored).await;
        IngestOutcome::Created(CreatedContent {
            record,
            metadata: IngestionMetadata {
                content_type: kind,
                content_id,
                author_id: actor_id.to_string(),
                timestamp: Utc::now(),
            },
        })
    }

    /// Fetch one record with its author. Viewing a sentence or word counts a view.
    pub async fn get(&self, tag: &str, id: &str) -> Result<ContentRecord, ContentError> {
        let kind = validate_type(tag)?;
        self.repository.record_view(kind, id).await?;
        self.repository
            .fetch_with_author(kind, id)
            .await?
            .ok_or(ContentError::NotFound)
    }

    /// Newest first. `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub async fn list(
        &self,
        tag: &str,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ContentRecord>, ContentError> {
        let kind = validate_type(tag)?;
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).max(0);
        Ok(self.repository.list_with_author(kind, limit, offset).await?)
    }

    /// Replace the fields of a record owned by `actor_id`, under the same rules as creation.
    pub async fn update(
        &self,
        tag: &str,
        id: &str,
        raw: Value,
        actor_id: &str,
    ) -> Result<ContentRecord, ContentError> {
        let kind = validate_type(tag)?;
        self.ensure_owner(kind, id, actor_id).await?;
        let record = self.prepare(kind, raw, actor_id)?;

        let stored = self
            .repository
            .update(id, &record)
            .await?
            .ok_or(ContentError::NotFound)?;
        info!(content_type = %kind, content_id = id, author_id = actor_id, "Content updated");
        Ok(self.rehydrate(kind, id, stored).await)
    }

    pub async fn delete(&self, tag: &str, id: &str, actor_id: &str) -> Result<(), ContentError> {
        let kind = validate_type(tag)?;
        self.ensure_owner(kind, id, actor_id).await?;
        if self.repository.delete(kind, id).await? == 0 {
            return Err(ContentError::NotFound);
        }
        info!(content_type = %kind, content_id = id, author_id = actor_id, "Content deleted");
        Ok(())
    }

    fn prepare(&self, kind: ContentKind, raw: Value, actor_id: &str) -> Result<NewContent, Rejection> {
        let data = RawContent::from_value(raw)
            .ok_or_else(|| Rejection::Invalid(vec![messages::DATA_NOT_OBJECT.to_string()]))?;
        validate_fields(kind, &data).map_err(Rejection::Invalid)?;

        let handler = content_registry::lookup(kind).ok_or_else(|| Rejection::UnknownType {
            received: kind.to_string(),
            accepted: content_registry::registered_kinds(),
        })?;
        let mut record = coerce(handler, &data, actor_id);
        if self.options.apply_category_overrides {
            apply_category_override(handler, &mut record);
        }
        Ok(record)
    }

    async fn ensure_owner(
        &self,
        kind: ContentKind,
        id: &str,
        actor_id: &str,
    ) -> Result<(), ContentError> {
        match self.repository.author_of(kind, id).await? {
            None => Err(ContentError::NotFound),
            Some(author_id) if author_id != actor_id => {
                warn!(content_type = %kind, content_id = id, actor_id, "Rejected change by non-owner");
                Err(ContentError::Forbidden)
            }
            Some(_) => Ok(()),
        }
    }

    async fn rehydrate(&self, kind: ContentKind, id: &str, stored: ContentRecord) -> ContentRecord {
        match self.repository.fetch_with_author(kind, id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!(content_type = %kind, content_id = id, "Stored content missing on read-back");
                stored
            }
            Err(err) => {
                warn!(
                    content_type = %kind,
                    content_id = id,
                    error = %err,
                    "Author join failed, returning stored content"
                );
                stored
            }
        }
    }
}
