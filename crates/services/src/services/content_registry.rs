//! One handler per content kind, built once and looked up by tag.
//!
//! Adding a kind means registering one entry here: its rules, its coercion
//! and the storage entity that `create`/`read` dispatch to.

use std::collections::HashMap;

use db::models::{
    content::ContentFields,
    content_kind::{ContentEntity, ContentKind},
};
use once_cell::sync::Lazy;

use super::{
    content_coercion as coerce,
    content_validation::{self as validate, messages},
    raw_content::RawContent,
};

pub type FieldRules = fn(&RawContent, &mut Vec<String>);
pub type Coercion = fn(&RawContent) -> ContentFields;

/// Replaces the caller's category with a fixed value for a kind.
///
/// Applied to video, question and truth entries. Whether the product wants
/// this is unconfirmed; it can be switched off with
/// `IngestionOptions::apply_category_overrides`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryOverride {
    pub category: &'static str,
}

#[derive(Debug)]
pub struct ContentHandler {
    pub kind: ContentKind,
    pub title_required: &'static str,
    pub validate: FieldRules,
    pub coerce: Coercion,
    pub category_override: Option<CategoryOverride>,
    pub entity: &'static ContentEntity,
}

fn entry(
    kind: ContentKind,
    validate: FieldRules,
    coerce: Coercion,
    category_override: Option<&'static str>,
) -> (ContentKind, ContentHandler) {
    let title_required = match kind {
        ContentKind::Sentence => messages::SENTENCE_TITLE_REQUIRED,
        ContentKind::Word => messages::WORD_TITLE_REQUIRED,
        _ => messages::TITLE_REQUIRED,
    };
    (
        kind,
        ContentHandler {
            kind,
            title_required,
            validate,
            coerce,
            category_override: category_override.map(|category| CategoryOverride { category }),
            entity: kind.entity(),
        },
    )
}

static REGISTRY: Lazy<HashMap<ContentKind, ContentHandler>> = Lazy::new(|| {
    HashMap::from([
        entry(ContentKind::Post, validate::validate_text, coerce::post, None),
        entry(ContentKind::Truth, validate::validate_text, coerce::truth, Some("حقائق")),
        entry(ContentKind::Book, validate::validate_book, coerce::book, None),
        entry(ContentKind::Idea, validate::validate_idea, coerce::idea, None),
        entry(ContentKind::Image, validate::validate_image, coerce::image, None),
        entry(ContentKind::Video, validate::validate_video, coerce::video, Some("فيديوهات")),
        entry(ContentKind::Question, validate::validate_question, coerce::question, Some("أسئلة")),
        entry(ContentKind::Ad, validate::validate_ad, coerce::ad, None),
        entry(ContentKind::Product, validate::validate_product, coerce::product, None),
        entry(ContentKind::Sentence, validate::validate_sentence, coerce::sentence, None),
        entry(ContentKind::Word, validate::validate_word, coerce::word, None),
    ])
});

pub fn lookup(kind: ContentKind) -> Option<&'static ContentHandler> {
    REGISTRY.get(&kind)
}

/// Registered kinds in declaration order.
pub fn registered_kinds() -> Vec<ContentKind> {
    ContentKind::all()
        .into_iter()
        .filter(|kind| REGISTRY.contains_key(kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_is_registered() {
        assert_eq!(registered_kinds(), ContentKind::all());
        for kind in ContentKind::all() {
            let handler = lookup(kind).unwrap();
            assert_eq!(handler.kind, kind);
            assert_eq!(handler.entity.kind, kind);
        }
    }

    #[test]
    fn test_category_overrides_are_limited_to_three_kinds() {
        let overridden: Vec<_> = ContentKind::all()
            .into_iter()
            .filter(|kind| lookup(*kind).unwrap().category_override.is_some())
            .collect();
        assert_eq!(
            overridden,
            vec![ContentKind::Video, ContentKind::Truth, ContentKind::Question]
        );
    }
}
