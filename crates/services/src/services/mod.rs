pub mod content_coercion;
pub mod content_ingestion;
pub mod content_registry;
pub mod content_repository;
pub mod content_validation;
pub mod database_validator;
pub mod engagement;
pub mod raw_content;
pub mod storage_errors;
