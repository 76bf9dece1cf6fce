//! Type and field validation for incoming content.
//!
//! Field checks never stop at the first problem: every violated rule is
//! reported so the caller can fix them all at once.

use std::str::FromStr;

use db::models::content::{IdeaPriority, QuestionType};
use db::models::content_kind::ContentKind;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use utils::media_url;

use super::{content_registry, raw_content::RawContent};

pub mod messages {
    pub const TITLE_REQUIRED: &str = "العنوان مطلوب";
    pub const SENTENCE_TITLE_REQUIRED: &str = "نص الجملة مطلوب";
    pub const WORD_TITLE_REQUIRED: &str = "الكلمة مطلوبة";
    pub const CATEGORY_REQUIRED: &str = "التصنيف مطلوب";
    pub const CONTENT_REQUIRED: &str = "المحتوى مطلوب";
    pub const SENTENCE_CONTENT_REQUIRED: &str = "ترجمة الجملة مطلوبة";
    pub const WORD_CONTENT_REQUIRED: &str = "معنى الكلمة مطلوب";
    pub const SENTENCE_TITLE_TOO_LONG: &str = "يجب ألا تتجاوز الجملة 200 حرف";
    pub const SENTENCE_CONTENT_TOO_LONG: &str = "يجب ألا تتجاوز الترجمة 1000 حرف";
    pub const WORD_TITLE_TOO_LONG: &str = "يجب ألا تتجاوز الكلمة 100 حرف";
    pub const WORD_CONTENT_TOO_LONG: &str = "يجب ألا يتجاوز المعنى 500 حرف";
    pub const IMAGE_REQUIRED: &str = "رابط الصورة مطلوب";
    pub const DESCRIPTION_REQUIRED: &str = "وصف الصورة مطلوب";
    pub const IMAGE_URL_INVALID: &str = "رابط الصورة غير صالح";
    pub const VIDEO_URL_INVALID: &str = "رابط الفيديو غير صالح";
    pub const ISBN_INVALID: &str = "رقم ISBN غير صالح، يجب أن يتكون من 10 أو 13 رقماً";
    pub const PAGES_INVALID: &str = "عدد الصفحات يجب أن يكون عدداً صحيحاً غير سالب";
    pub const PRIORITY_INVALID: &str = "الأولوية يجب أن تكون low أو medium أو high";
    pub const DURATION_INVALID: &str = "مدة الفيديو يجب أن تكون بصيغة HH:MM:SS";
    pub const QUESTION_TYPE_INVALID: &str =
        "نوع السؤال يجب أن يكون needs_answer أو answered أو discussion";
    pub const TARGET_AMOUNT_INVALID: &str = "المبلغ المستهدف يجب أن يكون رقماً غير سالب";
    pub const CURRENT_AMOUNT_INVALID: &str = "المبلغ الحالي يجب أن يكون رقماً غير سالب";
    pub const DEADLINE_INVALID: &str = "تاريخ الانتهاء غير صالح";
    pub const PRICE_REQUIRED: &str = "السعر مطلوب";
    pub const PRICE_INVALID: &str = "السعر يجب أن يكون رقماً غير سالب";
    pub const CURRENCY_REQUIRED: &str = "العملة مطلوبة";
    pub const DATA_NOT_OBJECT: &str = "بيانات المحتوى يجب أن تكون كائن JSON";
}

static ISBN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{10}|\d{13})$").expect("valid regex"));
static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("valid regex"));

/// Why a request never reached storage
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("unknown content type: {received}")]
    UnknownType {
        received: String,
        accepted: Vec<ContentKind>,
    },
    #[error("validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl Rejection {
    /// User-facing summary
    pub fn message(&self) -> String {
        match self {
            Rejection::UnknownType { accepted, .. } => format!(
                "نوع المحتوى غير مدعوم. الأنواع المدعومة: {}",
                accepted
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Rejection::Invalid(_) => "بيانات غير صالحة".to_string(),
        }
    }
}

/// Resolve a caller-supplied tag to a registered kind.
pub fn validate_type(tag: &str) -> Result<ContentKind, Rejection> {
    ContentKind::from_str(tag)
        .ok()
        .filter(|kind| content_registry::lookup(*kind).is_some())
        .ok_or_else(|| Rejection::UnknownType {
            received: tag.to_string(),
            accepted: content_registry::registered_kinds(),
        })
}

/// Check every rule for `kind`, collecting all violations.
pub fn validate_fields(kind: ContentKind, data: &RawContent) -> Result<(), Vec<String>> {
    let Some(handler) = content_registry::lookup(kind) else {
        return Err(vec![format!("unregistered content type: {kind}")]);
    };

    let mut errors = Vec::new();
    if !data.is_present("title") {
        errors.push(handler.title_required.to_string());
    }
    if !data.is_present("category") {
        errors.push(messages::CATEGORY_REQUIRED.to_string());
    }

    (handler.validate)(data, &mut errors);

    if let Some(image) = data.trimmed("image")
        && !media_url::is_acceptable(&image)
    {
        errors.push(messages::IMAGE_URL_INVALID.to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn require(data: &RawContent, key: &str, message: &str, errors: &mut Vec<String>) {
    if !data.is_present(key) {
        errors.push(message.to_string());
    }
}

fn max_chars(data: &RawContent, key: &str, limit: usize, message: &str, errors: &mut Vec<String>) {
    if let Some(value) = data.trimmed(key)
        && value.chars().count() > limit
    {
        errors.push(message.to_string());
    }
}

fn non_negative_amount(data: &RawContent, key: &str, message: &str, errors: &mut Vec<String>) {
    match data.number(key) {
        Ok(Some(amount)) if amount < 0.0 => errors.push(message.to_string()),
        Err(_) => errors.push(message.to_string()),
        _ => {}
    }
}

pub(crate) fn validate_text(data: &RawContent, errors: &mut Vec<String>) {
    require(data, "content", messages::CONTENT_REQUIRED, errors);
}

pub(crate) fn validate_book(data: &RawContent, errors: &mut Vec<String>) {
    validate_text(data, errors);
    if let Some(isbn) = data.trimmed("isbn")
        && !ISBN.is_match(&isbn.replace('-', ""))
    {
        errors.push(messages::ISBN_INVALID.to_string());
    }
    match data.integer("pages") {
        Ok(Some(pages)) if pages < 0 => errors.push(messages::PAGES_INVALID.to_string()),
        Err(_) => errors.push(messages::PAGES_INVALID.to_string()),
        _ => {}
    }
}

pub(crate) fn validate_idea(data: &RawContent, errors: &mut Vec<String>) {
    validate_text(data, errors);
    if let Some(priority) = data.trimmed("priority")
        && IdeaPriority::from_str(&priority).is_err()
    {
        errors.push(messages::PRIORITY_INVALID.to_string());
    }
}

pub(crate) fn validate_image(data: &RawContent, errors: &mut Vec<String>) {
    require(data, "image", messages::IMAGE_REQUIRED, errors);
    require(data, "description", messages::DESCRIPTION_REQUIRED, errors);
}

pub(crate) fn validate_video(data: &RawContent, errors: &mut Vec<String>) {
    validate_text(data, errors);
    if let Some(duration) = data.trimmed("duration")
        && !DURATION.is_match(&duration)
    {
        errors.push(messages::DURATION_INVALID.to_string());
    }
    if let Some(video_url) = data.trimmed("videoUrl")
        && !media_url::is_acceptable(&video_url)
    {
        errors.push(messages::VIDEO_URL_INVALID.to_string());
    }
}

pub(crate) fn validate_question(data: &RawContent, errors: &mut Vec<String>) {
    validate_text(data, errors);
    if let Some(question_type) = data.trimmed("type")
        && QuestionType::from_str(&question_type).is_err()
    {
        errors.push(messages::QUESTION_TYPE_INVALID.to_string());
    }
}

pub(crate) fn validate_ad(data: &RawContent, errors: &mut Vec<String>) {
    validate_text(data, errors);
    non_negative_amount(data, "targetAmount", messages::TARGET_AMOUNT_INVALID, errors);
    non_negative_amount(data, "currentAmount", messages::CURRENT_AMOUNT_INVALID, errors);
    if data.date("deadline").is_err() {
        errors.push(messages::DEADLINE_INVALID.to_string());
    }
}

pub(crate) fn validate_product(data: &RawContent, errors: &mut Vec<String>) {
    validate_text(data, errors);
    if data.is_present("price") {
        non_negative_amount(data, "price", messages::PRICE_INVALID, errors);
    } else {
        errors.push(messages::PRICE_REQUIRED.to_string());
    }
    require(data, "currency", messages::CURRENCY_REQUIRED, errors);
}

pub(crate) fn validate_sentence(data: &RawContent, errors: &mut Vec<String>) {
    require(data, "content", messages::SENTENCE_CONTENT_REQUIRED, errors);
    max_chars(data, "title", 200, messages::SENTENCE_TITLE_TOO_LONG, errors);
    max_chars(data, "content", 1000, messages::SENTENCE_CONTENT_TOO_LONG, errors);
}

pub(crate) fn validate_word(data: &RawContent, errors: &mut Vec<String>) {
    require(data, "content", messages::WORD_CONTENT_REQUIRED, errors);
    max_chars(data, "title", 100, messages::WORD_TITLE_TOO_LONG, errors);
    max_chars(data, "content", 500, messages::WORD_CONTENT_TOO_LONG, errors);
}
