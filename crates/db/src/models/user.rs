use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;

/// Public profile of a member, joined onto everything they author
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile fields synced from the session provider
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpsertUser {
    pub name: String,
    pub username: Option<String>,
    pub image: Option<String>,
}

impl User {
    pub async fn upsert(pool: &SqlitePool, id: &str, data: &UpsertUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (id, name, username, image)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   username = excluded.username,
                   image = excluded.image,
                   updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
               RETURNING id, name, username, image, created_at, updated_at"#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.username)
        .bind(&data.image)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, username, image, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
