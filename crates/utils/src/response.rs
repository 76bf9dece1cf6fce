use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Success envelope returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T, M = ()> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<M>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
            metadata: None,
        }
    }
}

impl<T, M> ApiResponse<T, M> {
    pub fn success_with_metadata(data: T, message: impl Into<String>, metadata: M) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            metadata: Some(metadata),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn metadata(&self) -> Option<&M> {
        self.metadata.as_ref()
    }
}

/// Failure envelope: `{ success: false, error, code, details?, received? }`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            details: None,
            received: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_received(mut self, received: serde_json::Value) -> Self {
        self.received = Some(received);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_empty_metadata() {
        let value = serde_json::to_value(ApiResponse::success(5)).unwrap();
        assert_eq!(value, serde_json::json!({ "success": true, "data": 5 }));
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody::new("VALIDATION_FAILED", "bad input")
            .with_details(vec!["one".to_string(), "two".to_string()]);
        let value = serde_json::to_value(body).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["code"], "VALIDATION_FAILED");
        assert_eq!(value["details"].as_array().unwrap().len(), 2);
        assert!(value.get("received").is_none());
    }
}
