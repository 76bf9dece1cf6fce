//! Likes, comments, shares and pronunciations attached to content rows.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use ts_rs::TS;
use uuid::Uuid;

use super::content_kind::ContentKind;

/// Result of flipping a user's like on a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct LikeToggle {
    pub liked: bool,
    pub likes: i64,
}

pub struct Like;

impl Like {
    /// Remove the user's like if present, otherwise add it.
    pub async fn toggle(
        pool: &SqlitePool,
        kind: ContentKind,
        content_id: &str,
        user_id: &str,
    ) -> Result<LikeToggle, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let removed = sqlx::query(
            "DELETE FROM likes WHERE content_type = $1 AND content_id = $2 AND user_id = $3",
        )
        .bind(kind.to_string())
        .bind(content_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let liked = removed == 0;
        if liked {
            sqlx::query(
                "INSERT INTO likes (id, content_type, content_id, user_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(kind.to_string())
            .bind(content_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        let likes: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM likes WHERE content_type = $1 AND content_id = $2",
        )
        .bind(kind.to_string())
        .bind(content_id)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(LikeToggle { liked, likes })
    }
}

pub struct Comment;

impl Comment {
    pub async fn create(
        pool: &SqlitePool,
        kind: ContentKind,
        content_id: &str,
        user_id: &str,
        body: &str,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO comments (id, content_type, content_id, user_id, body) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&id)
        .bind(kind.to_string())
        .bind(content_id)
        .bind(user_id)
        .bind(body)
        .execute(pool)
        .await?;
        Ok(id)
    }
}

pub struct Share;

impl Share {
    pub async fn create(
        pool: &SqlitePool,
        kind: ContentKind,
        content_id: &str,
        user_id: &str,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO shares (id, content_type, content_id, user_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(&id)
        .bind(kind.to_string())
        .bind(content_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(id)
    }
}

/// A recorded reading of a sentence or word
pub struct Pronunciation;

impl Pronunciation {
    pub async fn create(
        pool: &SqlitePool,
        kind: ContentKind,
        content_id: &str,
        user_id: &str,
        audio_url: &str,
        dialect: Option<&str>,
    ) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            r#"INSERT INTO pronunciations (id, content_type, content_id, user_id, audio_url, dialect)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(&id)
        .bind(kind.to_string())
        .bind(content_id)
        .bind(user_id)
        .bind(audio_url)
        .bind(dialect)
        .execute(pool)
        .await?;
        Ok(id)
    }
}
