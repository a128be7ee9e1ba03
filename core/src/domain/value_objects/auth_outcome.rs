//! Outcome and envelope types returned by authentication operations.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ErrorPayload;

/// Result of an outward-facing authentication operation
///
/// Operations never fault past the service boundary; a rejected or failed
/// call is reported through `error` with `success == false`.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    /// Whether the operation succeeded
    pub success: bool,
    /// Payload returned by the remote API on success
    pub data: Option<Value>,
    /// Structured failure payload on failure
    pub error: Option<ErrorPayload>,
}

impl AuthOutcome {
    /// Successful outcome carrying the API payload
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed outcome carrying the failure payload
    pub fn failure(error: ErrorPayload) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    /// Message of the failure payload, if any
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.message.as_str())
    }
}

/// Wrapper returned by the user-data endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDataEnvelope {
    /// Whether a profile payload was returned
    pub success: bool,
    /// The profile payload, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// The cleaned phone format the payload was fetched with
    #[serde(rename = "phoneFormat", skip_serializing_if = "Option::is_none")]
    pub phone_format: Option<String>,
}

impl UserDataEnvelope {
    /// Envelope for a returned profile payload
    pub fn found(data: Value, phone_format: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            phone_format: Some(phone_format.into()),
        }
    }

    /// Envelope for an empty response
    pub fn missing() -> Self {
        Self {
            success: false,
            data: None,
            phone_format: None,
        }
    }
}

/// Truthiness of an opaque payload
///
/// `null`, `false`, zero, and the empty string count as absent; everything
/// else, including empty arrays and objects, counts as present. The remote
/// API leans on this convention for its boolean-like responses.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Normalizes a profile payload for the post-verification completion signal
///
/// Unwraps a `ResultSet` field when the payload carries a non-empty one,
/// and yields nothing otherwise.
pub fn normalize_user_data(payload: Option<&Value>) -> Option<Value> {
    payload
        .and_then(|v| v.get("ResultSet"))
        .filter(|v| is_truthy(v))
        .cloned()
}
