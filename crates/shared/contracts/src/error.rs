//! Error body returned by every HTTP-facing service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
                request_id: request_id.into(),
                timestamp: Utc::now(),
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope() {
        let response = ErrorResponse::new("CONFLICT", "username already exists", "req-1")
            .with_details(json!({ "constraint": "users_username_key" }));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], "CONFLICT");
        assert_eq!(json["error"]["requestId"], "req-1");
        assert_eq!(json["error"]["details"]["constraint"], "users_username_key");
        assert!(json["error"]["timestamp"].is_string());
    }
}
