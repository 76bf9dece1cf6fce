use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use ts_rs::TS;

/// Discriminator selecting the rules, fields and table of a content record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ContentKind {
    Post,
    Book,
    Idea,
    Image,
    Video,
    Truth,
    Question,
    Ad,
    Product,
    Sentence,
    Word,
}

impl ContentKind {
    /// Every accepted tag, in declaration order.
    pub fn all() -> Vec<ContentKind> {
        ContentKind::iter().collect()
    }

    pub fn entity(self) -> &'static ContentEntity {
        match self {
            ContentKind::Post => &POSTS,
            ContentKind::Book => &BOOKS,
            ContentKind::Idea => &IDEAS,
            ContentKind::Image => &IMAGES,
            ContentKind::Video => &VIDEOS,
            ContentKind::Truth => &TRUTHS,
            ContentKind::Question => &QUESTIONS,
            ContentKind::Ad => &ADS,
            ContentKind::Product => &PRODUCTS,
            ContentKind::Sentence => &SENTENCES,
            ContentKind::Word => &WORDS,
        }
    }

    /// Sentence and word entries carry a view counter and pronunciations.
    pub fn is_lexicon(self) -> bool {
        matches!(self, ContentKind::Sentence | ContentKind::Word)
    }
}

/// How a column is rendered into the JSON record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnShape {
    Scalar,
    /// INTEGER 0/1 rendered as a JSON boolean
    Flag,
    /// TEXT holding a JSON array
    List,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub key: &'static str,
    pub shape: ColumnShape,
}

impl ColumnSpec {
    const fn scalar(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            key,
            shape: ColumnShape::Scalar,
        }
    }

    const fn flag(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            key,
            shape: ColumnShape::Flag,
        }
    }

    const fn list(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            key,
            shape: ColumnShape::List,
        }
    }

    fn render(&self, prefix: &str) -> String {
        match self.shape {
            ColumnShape::Scalar => format!("'{}', {}{}", self.key, prefix, self.name),
            ColumnShape::Flag => format!(
                "'{}', json(CASE WHEN {}{} THEN 'true' ELSE 'false' END)",
                self.key, prefix, self.name
            ),
            ColumnShape::List => format!("'{}', json({}{})", self.key, prefix, self.name),
        }
    }
}

/// Columns present on every content table
pub const SHARED_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::scalar("id", "id"),
    ColumnSpec::scalar("title", "title"),
    ColumnSpec::scalar("category", "category"),
    ColumnSpec::scalar("subcategory", "subcategory"),
    ColumnSpec::scalar("image", "image"),
    ColumnSpec::scalar("author_id", "authorId"),
    ColumnSpec::scalar("created_at", "createdAt"),
    ColumnSpec::scalar("updated_at", "updatedAt"),
];

/// Storage entity backing one content kind
#[derive(Debug)]
pub struct ContentEntity {
    pub kind: ContentKind,
    pub table: &'static str,
    /// Columns specific to this kind
    pub columns: &'static [ColumnSpec],
}

impl ContentEntity {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        SHARED_COLUMNS
            .iter()
            .chain(self.columns.iter())
            .find(|column| column.name == name)
    }

    /// Argument list for `json_object(...)` covering every column of the row.
    /// `prefix` qualifies column names, e.g. `"t."`.
    pub fn projection(&self, prefix: &str) -> String {
        SHARED_COLUMNS
            .iter()
            .chain(self.columns.iter())
            .map(|column| column.render(prefix))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

const CONTENT: ColumnSpec = ColumnSpec::scalar("content", "content");

static POSTS: ContentEntity = ContentEntity {
    kind: ContentKind::Post,
    table: "posts",
    columns: &[CONTENT],
};

static TRUTHS: ContentEntity = ContentEntity {
    kind: ContentKind::Truth,
    table: "truths",
    columns: &[CONTENT],
};

static BOOKS: ContentEntity = ContentEntity {
    kind: ContentKind::Book,
    table: "books",
    columns: &[
        CONTENT,
        ColumnSpec::scalar("author_name", "authorName"),
        ColumnSpec::scalar("pages", "pages"),
        ColumnSpec::scalar("language", "language"),
        ColumnSpec::scalar("isbn", "isbn"),
    ],
};

static IDEAS: ContentEntity = ContentEntity {
    kind: ContentKind::Idea,
    table: "ideas",
    columns: &[
        CONTENT,
        ColumnSpec::scalar("status", "status"),
        ColumnSpec::scalar("priority", "priority"),
    ],
};

static IMAGES: ContentEntity = ContentEntity {
    kind: ContentKind::Image,
    table: "images",
    columns: &[
        ColumnSpec::scalar("description", "description"),
        ColumnSpec::scalar("location", "location"),
        ColumnSpec::scalar("resolution", "resolution"),
        ColumnSpec::list("tags", "tags"),
    ],
};

static VIDEOS: ContentEntity = ContentEntity {
    kind: ContentKind::Video,
    table: "videos",
    columns: &[
        CONTENT,
        ColumnSpec::scalar("video_url", "videoUrl"),
        ColumnSpec::scalar("duration", "duration"),
    ],
};

static QUESTIONS: ContentEntity = ContentEntity {
    kind: ContentKind::Question,
    table: "questions",
    columns: &[CONTENT, ColumnSpec::scalar("question_type", "questionType")],
};

static ADS: ContentEntity = ContentEntity {
    kind: ContentKind::Ad,
    table: "ads",
    columns: &[
        CONTENT,
        ColumnSpec::scalar("target_amount", "targetAmount"),
        ColumnSpec::scalar("current_amount", "currentAmount"),
        ColumnSpec::scalar("deadline", "deadline"),
    ],
};

static PRODUCTS: ContentEntity = ContentEntity {
    kind: ContentKind::Product,
    table: "products",
    columns: &[
        CONTENT,
        ColumnSpec::scalar("price", "price"),
        ColumnSpec::scalar("currency", "currency"),
        ColumnSpec::flag("in_stock", "inStock"),
        ColumnSpec::list("sizes", "sizes"),
        ColumnSpec::list("colors", "colors"),
    ],
};

static SENTENCES: ContentEntity = ContentEntity {
    kind: ContentKind::Sentence,
    table: "sentences",
    columns: &[CONTENT, ColumnSpec::scalar("views", "views")],
};

static WORDS: ContentEntity = ContentEntity {
    kind: ContentKind::Word,
    table: "words",
    columns: &[CONTENT, ColumnSpec::scalar("views", "views")],
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_tags_parse_lowercase() {
        assert_eq!(ContentKind::from_str("sentence").unwrap(), ContentKind::Sentence);
        assert_eq!(ContentKind::Ad.to_string(), "ad");
        assert!(ContentKind::from_str("Post").is_err());
        assert!(ContentKind::from_str("poem").is_err());
    }

    #[test]
    fn test_every_kind_has_its_own_table() {
        let mut tables: Vec<_> = ContentKind::all()
            .into_iter()
            .map(|kind| {
                assert_eq!(kind.entity().kind, kind);
                kind.entity().table
            })
            .collect();
        tables.sort();
        tables.dedup();
        assert_eq!(tables.len(), 11);
    }

    #[test]
    fn test_projection_renders_shapes() {
        let projection = ContentKind::Product.entity().projection("t.");
        assert!(projection.starts_with("'id', t.id, 'title', t.title"));
        assert!(projection.contains("'authorId', t.author_id"));
        assert!(projection.contains("'inStock', json(CASE WHEN t.in_stock THEN 'true' ELSE 'false' END)"));
        assert!(projection.contains("'sizes', json(t.sizes)"));
    }
}
