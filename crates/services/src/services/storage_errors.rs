//! Translation of storage failures into user-facing status/message pairs.

use axum::http::StatusCode;
use sqlx::error::ErrorKind;
use tracing::error;

/// Failure classes reported by the storage layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageErrorCode {
    UniqueViolation,
    NotFound,
    ForeignKeyViolation,
    CheckViolation,
    /// Schema-level rejection raised by the store itself
    Validation,
    Unknown,
}

/// A translated storage failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFailure {
    pub code: StorageErrorCode,
    pub status: StatusCode,
    pub message: &'static str,
}

impl StorageErrorCode {
    pub fn classify(err: &sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StorageErrorCode::NotFound,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => StorageErrorCode::UniqueViolation,
                ErrorKind::ForeignKeyViolation => StorageErrorCode::ForeignKeyViolation,
                ErrorKind::CheckViolation => StorageErrorCode::CheckViolation,
                ErrorKind::NotNullViolation => StorageErrorCode::Validation,
                _ => StorageErrorCode::Unknown,
            },
            sqlx::Error::Encode(_) | sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StorageErrorCode::Validation
            }
            _ => StorageErrorCode::Unknown,
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            StorageErrorCode::NotFound => StatusCode::NOT_FOUND,
            StorageErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            StorageErrorCode::UniqueViolation
            | StorageErrorCode::ForeignKeyViolation
            | StorageErrorCode::CheckViolation
            | StorageErrorCode::Validation => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            StorageErrorCode::UniqueViolation => "هذا المحتوى موجود مسبقاً",
            StorageErrorCode::NotFound => "المحتوى المطلوب غير موجود",
            StorageErrorCode::ForeignKeyViolation => "المستخدم أو العنصر المرتبط غير موجود",
            StorageErrorCode::CheckViolation => "القيم المدخلة تخالف قيود قاعدة البيانات",
            StorageErrorCode::Validation => "بيانات غير صالحة لقاعدة البيانات",
            StorageErrorCode::Unknown => "حدث خطأ في الخادم، يرجى المحاولة لاحقاً",
        }
    }
}

/// Map a storage error to the status and message shown to the caller.
/// Unclassified errors are logged.
pub fn translate(err: &sqlx::Error) -> StorageFailure {
    let code = StorageErrorCode::classify(err);
    if code == StorageErrorCode::Unknown {
        error!(error = %err, "Unclassified storage error");
    }
    StorageFailure {
        code,
        status: code.status(),
        message: code.message(),
    }
}
