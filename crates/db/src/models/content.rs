use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

use super::content_kind::{ContentEntity, ContentKind};

/// Status given to every new idea until a moderator reviews it
pub const DEFAULT_IDEA_STATUS: &str = "pending_review";

/// Counter columns owned by the storage layer; updates never overwrite them
const COUNTER_COLUMNS: &[&str] = &["views"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IdeaPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionType {
    #[default]
    NeedsAnswer,
    Answered,
    Discussion,
}

/// Body shared by post and truth
#[derive(Debug, Clone, PartialEq)]
pub struct TextFields {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub content: String,
    pub author_name: Option<String>,
    pub pages: Option<i64>,
    pub language: Option<String>,
    pub isbn: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdeaFields {
    pub content: String,
    pub status: String,
    pub priority: IdeaPriority,
}

/// Image entries are described rather than given a body
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFields {
    pub description: String,
    pub location: Option<String>,
    pub resolution: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoFields {
    pub content: String,
    pub video_url: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFields {
    pub content: String,
    pub question_type: QuestionType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdFields {
    pub content: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub content: String,
    pub price: f64,
    pub currency: String,
    pub in_stock: bool,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
}

/// Body shared by sentence and word entries
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconFields {
    pub content: String,
    pub views: i64,
}

/// Type-specific part of a record; the variant fixes the kind
#[derive(Debug, Clone, PartialEq)]
pub enum ContentFields {
    Post(TextFields),
    Truth(TextFields),
    Book(BookFields),
    Idea(IdeaFields),
    Image(ImageFields),
    Video(VideoFields),
    Question(QuestionFields),
    Ad(AdFields),
    Product(ProductFields),
    Sentence(LexiconFields),
    Word(LexiconFields),
}

/// A value bound into an INSERT or UPDATE
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(Option<String>),
    Integer(Option<i64>),
    Real(Option<f64>),
    Flag(bool),
    List(Vec<String>),
}

fn text(value: &str) -> ColumnValue {
    ColumnValue::Text(Some(value.to_string()))
}

fn optional_text(value: &Option<String>) -> ColumnValue {
    ColumnValue::Text(value.clone())
}

impl ContentFields {
    pub fn kind(&self) -> ContentKind {
        match self {
            ContentFields::Post(_) => ContentKind::Post,
            ContentFields::Truth(_) => ContentKind::Truth,
            ContentFields::Book(_) => ContentKind::Book,
            ContentFields::Idea(_) => ContentKind::Idea,
            ContentFields::Image(_) => ContentKind::Image,
            ContentFields::Video(_) => ContentKind::Video,
            ContentFields::Question(_) => ContentKind::Question,
            ContentFields::Ad(_) => ContentKind::Ad,
            ContentFields::Product(_) => ContentKind::Product,
            ContentFields::Sentence(_) => ContentKind::Sentence,
            ContentFields::Word(_) => ContentKind::Word,
        }
    }

    pub fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        match self {
            ContentFields::Post(fields) | ContentFields::Truth(fields) => {
                vec![("content", text(&fields.content))]
            }
            ContentFields::Book(fields) => vec![
                ("content", text(&fields.content)),
                ("author_name", optional_text(&fields.author_name)),
                ("pages", ColumnValue::Integer(fields.pages)),
                ("language", optional_text(&fields.language)),
                ("isbn", optional_text(&fields.isbn)),
            ],
            ContentFields::Idea(fields) => vec![
                ("content", text(&fields.content)),
                ("status", text(&fields.status)),
                ("priority", text(&fields.priority.to_string())),
            ],
            ContentFields::Image(fields) => vec![
                ("description", text(&fields.description)),
                ("location", optional_text(&fields.location)),
                ("resolution", optional_text(&fields.resolution)),
                ("tags", ColumnValue::List(fields.tags.clone())),
            ],
            ContentFields::Video(fields) => vec![
                ("content", text(&fields.content)),
                ("video_url", optional_text(&fields.video_url)),
                ("duration", optional_text(&fields.duration)),
            ],
            ContentFields::Question(fields) => vec![
                ("content", text(&fields.content)),
                ("question_type", text(&fields.question_type.to_string())),
            ],
            ContentFields::Ad(fields) => vec![
                ("content", text(&fields.content)),
                ("target_amount", ColumnValue::Real(Some(fields.target_amount))),
                ("current_amount", ColumnValue::Real(Some(fields.current_amount))),
                (
                    "deadline",
                    ColumnValue::Text(
                        fields
                            .deadline
                            .map(|deadline| deadline.to_rfc3339_opts(SecondsFormat::Millis, true)),
                    ),
                ),
            ],
            ContentFields::Product(fields) => vec![
                ("content", text(&fields.content)),
                ("price", ColumnValue::Real(Some(fields.price))),
                ("currency", text(&fields.currency)),
                ("in_stock", ColumnValue::Flag(fields.in_stock)),
                ("sizes", ColumnValue::List(fields.sizes.clone())),
                ("colors", ColumnValue::List(fields.colors.clone())),
            ],
            ContentFields::Sentence(fields) | ContentFields::Word(fields) => vec![
                ("content", text(&fields.content)),
                ("views", ColumnValue::Integer(Some(fields.views))),
            ],
        }
    }
}

/// A normalized record ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewContent {
    pub author_id: String,
    pub title: String,
    pub category: String,
    pub subcategory: Option<String>,
    pub image: Option<String>,
    pub fields: ContentFields,
}

impl NewContent {
    pub fn kind(&self) -> ContentKind {
        self.fields.kind()
    }

    /// Every writable column except `id` and `author_id`.
    pub fn columns(&self) -> Vec<(&'static str, ColumnValue)> {
        let mut columns = vec![
            ("title", text(&self.title)),
            ("category", text(&self.category)),
            ("subcategory", optional_text(&self.subcategory)),
            ("image", optional_text(&self.image)),
        ];
        columns.extend(self.fields.columns());
        columns
    }

    fn update_columns(&self) -> Vec<(&'static str, ColumnValue)> {
        self.columns()
            .into_iter()
            .filter(|(name, _)| !COUNTER_COLUMNS.contains(name))
            .collect()
    }
}

/// A stored record rendered with camelCase keys, possibly with joined relations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
pub struct ContentRecord(#[ts(type = "Record<string, unknown>")] pub Map<String, Value>);

impl ContentRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.str_field("id")
    }

    pub fn author_id(&self) -> Option<&str> {
        self.str_field("authorId")
    }

    fn decode(json: &str) -> Result<Self, sqlx::Error> {
        serde_json::from_str(json).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }
}

fn push_value(builder: &mut QueryBuilder<'_, Sqlite>, value: ColumnValue) {
    match value {
        ColumnValue::Text(value) => builder.push_bind(value),
        ColumnValue::Integer(value) => builder.push_bind(value),
        ColumnValue::Real(value) => builder.push_bind(value),
        ColumnValue::Flag(value) => builder.push_bind(value),
        ColumnValue::List(items) => {
            let encoded = serde_json::to_string(&items).unwrap_or_else(|_| "[]".to_string());
            builder.push_bind(encoded)
        }
    };
}

const USER_PROFILE: &str = "'id', u.id, 'name', u.name, 'username', u.username, 'image', u.image";

/// `SELECT json_object(...)` for a kind's table aliased `t`, joined with the
/// author profile, engagement lists and counts, and pronunciations for lexicon kinds.
/// Subquery results pass through `json()` so they embed as JSON, not strings.
fn joined_select(entity: &ContentEntity) -> String {
    let kind = entity.kind;
    let engagement =
        |alias: &str| format!("{alias}.content_type = '{kind}' AND {alias}.content_id = t.id");
    let user_of = |alias: &str| {
        format!(
            "json((SELECT json_object({USER_PROFILE}) FROM users u WHERE u.id = {alias}.user_id))"
        )
    };

    let mut fields = entity.projection("t.");
    fields.push_str(&format!(", 'type', '{kind}'"));
    fields.push_str(&format!(
        ", 'author', json((SELECT json_object({USER_PROFILE}) FROM users u WHERE u.id = t.author_id))"
    ));
    fields.push_str(&format!(
        ", 'likes', json((SELECT json_group_array(json_object('id', l.id, 'userId', l.user_id, 'createdAt', l.created_at)) FROM likes l WHERE {}))",
        engagement("l")
    ));
    fields.push_str(&format!(
        ", 'comments', json((SELECT json_group_array(json_object('id', c.id, 'body', c.body, 'createdAt', c.created_at, 'user', {})) FROM comments c WHERE {}))",
        user_of("c"),
        engagement("c")
    ));
    fields.push_str(&format!(
        ", 'shares', json((SELECT json_group_array(json_object('id', s.id, 'userId', s.user_id, 'createdAt', s.created_at)) FROM shares s WHERE {}))",
        engagement("s")
    ));
    fields.push_str(&format!(
        ", '_count', json_object('likes', (SELECT COUNT(*) FROM likes l WHERE {}), 'comments', (SELECT COUNT(*) FROM comments c WHERE {}), 'shares', (SELECT COUNT(*) FROM shares s WHERE {}))",
        engagement("l"),
        engagement("c"),
        engagement("s")
    ));
    if kind.is_lexicon() {
        fields.push_str(&format!(
            ", 'pronunciations', json((SELECT json_group_array(json_object('id', p.id, 'audioUrl', p.audio_url, 'dialect', p.dialect, 'createdAt', p.created_at, 'user', {})) FROM pronunciations p WHERE {}))",
            user_of("p"),
            engagement("p")
        ));
    }

    format!("SELECT json_object({fields}) FROM {} t", entity.table)
}

impl ContentRecord {
    /// Insert into the table of `data`'s kind and return the bare row.
    pub async fn create(pool: &SqlitePool, id: Uuid, data: &NewContent) -> Result<Self, sqlx::Error> {
        let entity = data.kind().entity();
        let columns = data.columns();

        let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (id, author_id", entity.table));
        for (name, _) in &columns {
            builder.push(", ");
            builder.push(*name);
        }
        builder.push(") VALUES (");
        builder.push_bind(id.to_string());
        builder.push(", ");
        builder.push_bind(data.author_id.clone());
        for (_, value) in columns {
            builder.push(", ");
            push_value(&mut builder, value);
        }
        builder.push(") RETURNING json_object(");
        builder.push(entity.projection(""));
        builder.push(")");

        let json: String = builder.build_query_scalar().fetch_one(pool).await?;
        Self::decode(&json)
    }

    pub async fn find_with_author(
        pool: &SqlitePool,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("{} WHERE t.id = $1", joined_select(kind.entity()));
        let json: Option<String> = sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await?;
        json.as_deref().map(Self::decode).transpose()
    }

    /// Newest first.
    pub async fn list_with_author(
        pool: &SqlitePool,
        kind: ContentKind,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "{} ORDER BY t.created_at DESC, t.rowid DESC LIMIT $1 OFFSET $2",
            joined_select(kind.entity())
        );
        let rows: Vec<String> = sqlx::query_scalar(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
        rows.iter().map(|json| Self::decode(json)).collect()
    }

    pub async fn author_of(
        pool: &SqlitePool,
        kind: ContentKind,
        id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        let sql = format!("SELECT author_id FROM {} WHERE id = $1", kind.entity().table);
        sqlx::query_scalar(&sql).bind(id).fetch_optional(pool).await
    }

    /// Overwrite the writable columns of an existing row. `author_id`,
    /// `created_at` and counters are left alone.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        data: &NewContent,
    ) -> Result<Option<Self>, sqlx::Error> {
        let entity = data.kind().entity();

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", entity.table));
        for (name, value) in data.update_columns() {
            builder.push(name);
            builder.push(" = ");
            push_value(&mut builder, value);
            builder.push(", ");
        }
        builder.push("updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ");
        builder.push_bind(id.to_string());
        builder.push(" RETURNING json_object(");
        builder.push(entity.projection(""));
        builder.push(")");

        let json: Option<String> = builder.build_query_scalar().fetch_optional(pool).await?;
        json.as_deref().map(Self::decode).transpose()
    }

    /// Delete the row and its engagement rows together.
    pub async fn delete(pool: &SqlitePool, kind: ContentKind, id: &str) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for table in ["likes", "comments", "shares", "pronunciations"] {
            let sql = format!("DELETE FROM {table} WHERE content_type = $1 AND content_id = $2");
            sqlx::query(&sql)
                .bind(kind.to_string())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.entity().table);
        let result = sqlx::query(&sql).bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    /// Bump the view counter of a sentence or word. No-op for other kinds.
    pub async fn record_view(pool: &SqlitePool, kind: ContentKind, id: &str) -> Result<(), sqlx::Error> {
        if !kind.is_lexicon() {
            return Ok(());
        }
        let sql = format!("UPDATE {} SET views = views + 1 WHERE id = $1", kind.entity().table);
        sqlx::query(&sql).bind(id).execute(pool).await?;
        Ok(())
    }
}
