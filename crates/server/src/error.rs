use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use services::services::{
    content_ingestion::ContentError,
    content_validation::Rejection,
    storage_errors::{StorageFailure, translate},
};
use thiserror::Error;
use tracing::debug;
use utils::response::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("authentication required")]
    AuthRequired,
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("not found")]
    NotFound,
    #[error("forbidden")]
    Forbidden,
    #[error("storage failure: {}", .0.message)]
    Storage(StorageFailure),
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Rejected(rejection) => ApiError::Rejected(rejection),
            ContentError::NotFound => ApiError::NotFound,
            ContentError::Forbidden => ApiError::Forbidden,
            ContentError::Storage(failure) => ApiError::Storage(failure),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Storage(translate(&err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidJson(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::AuthRequired => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("AUTH_REQUIRED", "يجب تسجيل الدخول أولاً"),
            ),
            ApiError::InvalidJson(reason) => {
                debug!(reason = %reason, "Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("INVALID_JSON", "صيغة البيانات المرسلة غير صالحة"),
                )
            }
            ApiError::InvalidQuery(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("INVALID_QUERY", "معاملات الطلب غير صالحة").with_details(vec![reason]),
            ),
            ApiError::Rejected(rejection) => {
                let message = rejection.message();
                let body = match rejection {
                    Rejection::UnknownType { received, .. } => {
                        ErrorBody::new("INVALID_CONTENT_TYPE", message)
                            .with_received(Value::String(received))
                    }
                    Rejection::Invalid(details) => {
                        ErrorBody::new("VALIDATION_FAILED", message).with_details(details)
                    }
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", "المحتوى المطلوب غير موجود"),
            ),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                ErrorBody::new("FORBIDDEN", "لا تملك صلاحية تعديل هذا المحتوى"),
            ),
            ApiError::Storage(failure) => {
                (failure.status, ErrorBody::new("DATABASE_ERROR", failure.message))
            }
        };
        (status, Json(body)).into_response()
    }
}
