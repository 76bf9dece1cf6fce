//! Likes, comments, shares and pronunciations on existing content.

use db::models::{
    content::ContentRecord,
    content_kind::ContentKind,
    engagement::{Comment, Like, LikeToggle, Pronunciation, Share},
};
use sqlx::SqlitePool;
use tracing::info;
use utils::media_url;

use super::{
    content_ingestion::ContentError,
    content_validation::{Rejection, validate_type},
};

pub mod messages {
    pub const COMMENT_REQUIRED: &str = "نص التعليق مطلوب";
    pub const COMMENT_TOO_LONG: &str = "يجب ألا يتجاوز التعليق 2000 حرف";
    pub const AUDIO_URL_INVALID: &str = "رابط التسجيل الصوتي غير صالح";
    pub const PRONUNCIATION_UNSUPPORTED: &str = "النطق متاح للجمل والكلمات فقط";
}

const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Clone)]
pub struct EngagementService {
    pool: SqlitePool,
}

impl EngagementService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn toggle_like(
        &self,
        tag: &str,
        content_id: &str,
        user_id: &str,
    ) -> Result<LikeToggle, ContentError> {
        let kind = self.existing(tag, content_id).await?;
        let toggle = Like::toggle(&self.pool, kind, content_id, user_id).await?;
        info!(
            content_type = %kind,
            content_id,
            user_id,
            liked = toggle.liked,
            "Like toggled"
        );
        Ok(toggle)
    }

    pub async fn comment(
        &self,
        tag: &str,
        content_id: &str,
        user_id: &str,
        body: &str,
    ) -> Result<String, ContentError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(invalid(messages::COMMENT_REQUIRED));
        }
        if body.chars().count() > MAX_COMMENT_CHARS {
            return Err(invalid(messages::COMMENT_TOO_LONG));
        }
        let kind = self.existing(tag, content_id).await?;
        Ok(Comment::create(&self.pool, kind, content_id, user_id, body).await?)
    }

    pub async fn share(
        &self,
        tag: &str,
        content_id: &str,
        user_id: &str,
    ) -> Result<String, ContentError> {
        let kind = self.existing(tag, content_id).await?;
        Ok(Share::create(&self.pool, kind, content_id, user_id).await?)
    }

    /// Attach a recorded reading to a sentence or word.
    pub async fn pronounce(
        &self,
        tag: &str,
        content_id: &str,
        user_id: &str,
        audio_url: &str,
        dialect: Option<&str>,
    ) -> Result<String, ContentError> {
        let kind = validate_type(tag)?;
        if !kind.is_lexicon() {
            return Err(invalid(messages::PRONUNCIATION_UNSUPPORTED));
        }
        if !media_url::is_acceptable(audio_url) {
            return Err(invalid(messages::AUDIO_URL_INVALID));
        }
        let kind = self.existing(tag, content_id).await?;
        let dialect = dialect.map(str::trim).filter(|d| !d.is_empty());
        Ok(Pronunciation::create(&self.pool, kind, content_id, user_id, audio_url.trim(), dialect).await?)
    }

    async fn existing(&self, tag: &str, content_id: &str) -> Result<ContentKind, ContentError> {
        let kind = validate_type(tag)?;
        match ContentRecord::author_of(&self.pool, kind, content_id).await? {
            Some(_) => Ok(kind),
            None => Err(ContentError::NotFound),
        }
    }
}

fn invalid(message: &str) -> ContentError {
    ContentError::Rejected(Rejection::Invalid(vec![message.to_string()]))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use db::{
        DBService,
        models::user::{UpsertUser, User},
    };
    use serde_json::json;

    use super::*;
    use crate::services::{
        content_ingestion::{ContentIngestion, IngestOutcome, IngestionOptions},
        content_repository::SqliteContentRepository,
    };

    async fn setup() -> (ContentIngestion, EngagementService) {
        let db = DBService::new_in_memory().await.unwrap();
        let profile = UpsertUser {
            name: "Amina".to_string(),
            username: Some("amina".to_string()),
            image: None,
        };
        User::upsert(&db.pool, "actor-1", &profile).await.unwrap();
        let ingestion = ContentIngestion::new(
            Arc::new(SqliteContentRepository::new(db.pool.clone())),
            IngestionOptions::default(),
        );
        (ingestion, EngagementService::new(db.pool))
    }

    async fn create(ingestion: &ContentIngestion, tag: &str) -> String {
        let data = json!({ "title": "Azul", "content": "Hello", "category": "c" });
        match ingestion.ingest(tag, data, "actor-1").await {
            IngestOutcome::Created(created) => created.metadata.content_id,
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_like_toggle_shows_in_joined_record() {
        let (ingestion, engagement) = setup().await;
        let id = create(&ingestion, "post").await;

        let toggle = engagement.toggle_like("post", &id, "actor-1").await.unwrap();
        assert_eq!(toggle, LikeToggle { liked: true, likes: 1 });
        let record = ingestion.get("post", &id).await.unwrap();
        assert_eq!(record.get("_count").unwrap()["likes"], 1);

        let toggle = engagement.toggle_like("post", &id, "actor-1").await.unwrap();
        assert_eq!(toggle, LikeToggle { liked: false, likes: 0 });
    }

    #[tokio::test]
    async fn test_like_on_missing_content_is_not_found() {
        let (_ingestion, engagement) = setup().await;
        assert!(matches!(
            engagement.toggle_like("post", "missing", "actor-1").await,
            Err(ContentError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_comment_requires_body() {
        let (ingestion, engagement) = setup().await;
        let id = create(&ingestion, "question").await;
        assert!(matches!(
            engagement.comment("question", &id, "actor-1", "   ").await,
            Err(ContentError::Rejected(_))
        ));

        engagement.comment("question", &id, "actor-1", " Good one ").await.unwrap();
        let record = ingestion.get("question", &id).await.unwrap();
        let comments = record.get("comments").unwrap().as_array().unwrap();
        assert_eq!(comments[0]["body"], "Good one");
        assert_eq!(comments[0]["user"]["username"], "amina");
    }

    #[tokio::test]
    async fn test_pronunciations_only_for_lexicon() {
        let (ingestion, engagement) = setup().await;
        let post = create(&ingestion, "post").await;
        assert!(matches!(
            engagement.pronounce("post", &post, "actor-1", "/audio/a.mp3", None).await,
            Err(ContentError::Rejected(_))
        ));

        let word = create(&ingestion, "word").await;
        assert!(matches!(
            engagement.pronounce("word", &word, "actor-1", "javascript:x", None).await,
            Err(ContentError::Rejected(_))
        ));
        engagement
            .pronounce("word", &word, "actor-1", "/audio/a.mp3", Some("Kabyle"))
            .await
            .unwrap();
        let record = ingestion.get("word", &word).await.unwrap();
        let pronunciations = record.get("pronunciations").unwrap().as_array().unwrap();
        assert_eq!(pronunciations[0]["dialect"], "Kabyle");
        assert_eq!(pronunciations[0]["user"]["name"], "Amina");
    }

    #[tokio::test]
    async fn test_share_counts() {
        let (ingestion, engagement) = setup().await;
        let id = create(&ingestion, "truth").await;
        engagement.share("truth", &id, "actor-1").await.unwrap();
        engagement.share("truth", &id, "actor-1").await.unwrap();
        let record = ingestion.get("truth", &id).await.unwrap();
        assert_eq!(record.get("_count").unwrap()["shares"], 2);
    }
}
