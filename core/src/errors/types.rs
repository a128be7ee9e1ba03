//! Structured failure payload attached to authentication outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AuthError;

/// Structured failure payload
///
/// Every outward-facing operation converts lower-layer rejections into this
/// shape, so callers always receive at least a `message` regardless of what
/// the server sent back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Raw rejection body from the server, when one was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorPayload {
    /// Create a new error payload
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            body: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach the raw rejection body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Normalize a server rejection into an error payload
    ///
    /// Prefers a string `message` field in the rejection body; otherwise the
    /// endpoint-specific fallback message is used and the raw body, if any,
    /// is kept for diagnosis.
    pub fn from_rejection(body: Option<Value>, fallback: &str) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string();

        Self {
            error: "NETWORK_OR_SERVER_ERROR".to_string(),
            message,
            body,
            timestamp: Utc::now(),
        }
    }
}

impl From<AuthError> for ErrorPayload {
    fn from(err: AuthError) -> Self {
        ErrorPayload::new(err.code(), err.to_string())
    }
}
