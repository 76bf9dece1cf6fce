//! Normalization of validated input into a storable record.
//!
//! Pure functions; callers validate first. Optional fields become `None`
//! when absent or blank, never an empty string or zero.

use std::str::FromStr;

use db::models::content::{
    AdFields, BookFields, ContentFields, DEFAULT_IDEA_STATUS, IdeaFields, IdeaPriority,
    ImageFields, LexiconFields, NewContent, ProductFields, QuestionFields, QuestionType,
    TextFields, VideoFields,
};
use tracing::debug;

use super::{content_registry::ContentHandler, raw_content::RawContent};

/// Build the record for `handler`'s kind, owned by `actor_id`.
pub fn coerce(handler: &ContentHandler, data: &RawContent, actor_id: &str) -> NewContent {
    NewContent {
        author_id: actor_id.to_string(),
        title: data.trimmed("title").unwrap_or_default(),
        category: data.trimmed("category").unwrap_or_default(),
        subcategory: data.trimmed("subcategory"),
        image: data.trimmed("image"),
        fields: (handler.coerce)(data),
    }
}

/// Replace the category with the kind's fixed value, if it has one.
pub fn apply_category_override(handler: &ContentHandler, record: &mut NewContent) {
    let Some(category_override) = handler.category_override else {
        return;
    };
    if record.category != category_override.category {
        debug!(
            content_type = %handler.kind,
            submitted = %record.category,
            forced = category_override.category,
            "Overriding submitted category"
        );
        record.category = category_override.category.to_string();
    }
}

fn content(data: &RawContent) -> String {
    data.trimmed("content").unwrap_or_default()
}

fn text_fields(data: &RawContent) -> TextFields {
    TextFields {
        content: content(data),
    }
}

pub(crate) fn post(data: &RawContent) -> ContentFields {
    ContentFields::Post(text_fields(data))
}

pub(crate) fn truth(data: &RawContent) -> ContentFields {
    ContentFields::Truth(text_fields(data))
}

pub(crate) fn book(data: &RawContent) -> ContentFields {
    ContentFields::Book(BookFields {
        content: content(data),
        author_name: data.trimmed("authorName"),
        pages: data.integer("pages").ok().flatten(),
        language: data.trimmed("language"),
        isbn: data.trimmed("isbn"),
    })
}

pub(crate) fn idea(data: &RawContent) -> ContentFields {
    ContentFields::Idea(IdeaFields {
        content: content(data),
        status: data
            .trimmed("status")
            .unwrap_or_else(|| DEFAULT_IDEA_STATUS.to_string()),
        priority: data
            .trimmed("priority")
            .and_then(|priority| IdeaPriority::from_str(&priority).ok())
            .unwrap_or_default(),
    })
}

pub(crate) fn image(data: &RawContent) -> ContentFields {
    ContentFields::Image(ImageFields {
        description: data.trimmed("description").unwrap_or_default(),
        location: data.trimmed("location"),
        resolution: data.trimmed("resolution"),
        tags: data.list("tags"),
    })
}

pub(crate) fn video(data: &RawContent) -> ContentFields {
    ContentFields::Video(VideoFields {
        content: content(data),
        video_url: data.trimmed("videoUrl"),
        duration: data.trimmed("duration"),
    })
}

pub(crate) fn question(data: &RawContent) -> ContentFields {
    ContentFields::Question(QuestionFields {
        content: content(data),
        question_type: data
            .trimmed("type")
            .and_then(|question_type| QuestionType::from_str(&question_type).ok())
            .unwrap_or_default(),
    })
}

pub(crate) fn ad(data: &RawContent) -> ContentFields {
    ContentFields::Ad(AdFields {
        content: content(data),
        target_amount: data.number("targetAmount").ok().flatten().unwrap_or(0.0),
        current_amount: data.number("currentAmount").ok().flatten().unwrap_or(0.0),
        deadline: data.date("deadline").ok().flatten(),
    })
}

pub(crate) fn product(data: &RawContent) -> ContentFields {
    ContentFields::Product(ProductFields {
        content: content(data),
        price: data.number("price").ok().flatten().unwrap_or(0.0),
        currency: data.trimmed("currency").unwrap_or_default(),
        in_stock: data.flag("inStock").unwrap_or(true),
        sizes: data.list("sizes"),
        colors: data.list("colors"),
    })
}

fn lexicon(data: &RawContent) -> LexiconFields {
    LexiconFields {
        content: content(data),
        views: 0,
    }
}

pub(crate) fn sentence(data: &RawContent) -> ContentFields {
    ContentFields::Sentence(lexicon(data))
}

pub(crate) fn word(data: &RawContent) -> ContentFields {
    ContentFields::Word(lexicon(data))
}
