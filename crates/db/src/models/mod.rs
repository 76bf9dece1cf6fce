pub mod content;
pub mod content_kind;
pub mod engagement;
pub mod user;
