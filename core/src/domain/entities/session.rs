//! Persisted session entity for the last authenticated identity.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AuthError;

/// Storage key for the last authenticated phone number
pub const KEY_PHONE_NUMBER: &str = "phoneNumber";

/// Storage key for the last authenticated service number
pub const KEY_SERVICE_NO: &str = "serviceNo";

/// Storage key for the cached profile payload (JSON-serialized)
pub const KEY_USER_DATA: &str = "userData";

/// Storage key for the last OTP issued by the server
pub const KEY_SENT_OTP: &str = "sentOtp";

/// Durable record of the last authenticated identity and cached profile data
///
/// Created on the first successful phone or password authentication, read on
/// every process start, destroyed on logout. All fields are optional; a
/// session without either `phone_number` or `service_no` carries no identity
/// and is never returned by a restore.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// E.164-like identifier, with or without a leading `+`
    pub phone_number: Option<String>,

    /// Alternate identity key used by password login
    pub service_no: Option<String>,

    /// Last fetched profile payload; opaque to the client
    pub user_data: Option<Value>,

    /// Last OTP issued for the in-flight phone verification
    pub sent_otp: Option<String>,
}

impl Session {
    /// Creates an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the phone number
    pub fn with_phone_number(mut self, phone_number: impl Into<String>) -> Self {
        self.phone_number = Some(phone_number.into());
        self
    }

    /// Sets the service number
    pub fn with_service_no(mut self, service_no: impl Into<String>) -> Self {
        self.service_no = Some(service_no.into());
        self
    }

    /// Sets the cached profile payload
    pub fn with_user_data(mut self, user_data: Value) -> Self {
        self.user_data = Some(user_data);
        self
    }

    /// Sets the issued OTP
    pub fn with_sent_otp(mut self, sent_otp: impl Into<String>) -> Self {
        self.sent_otp = Some(sent_otp.into());
        self
    }

    /// Whether the session carries an identity key
    pub fn has_identity(&self) -> bool {
        self.phone_number.is_some() || self.service_no.is_some()
    }

    /// Decodes a serialized `userData` value from storage
    ///
    /// The literal strings `"undefined"` and `"null"` are legacy sentinels
    /// and decode to `None`, as does a stored JSON `null`. Anything that
    /// fails to parse is reported as [`AuthError::CorruptSessionData`] so
    /// the store can erase it; the error never reaches the caller of a
    /// restore.
    pub fn decode_user_data(raw: &str) -> Result<Option<Value>, AuthError> {
        if raw == "undefined" || raw == "null" {
            return Ok(None);
        }
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Null) => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(AuthError::CorruptSessionData),
        }
    }

    /// Serializes a profile payload for storage
    pub fn encode_user_data(value: &Value) -> String {
        value.to_string()
    }

    /// Assembles a restored session from raw storage strings
    ///
    /// Returns `(None, _)` when neither identity key holds a non-empty
    /// value. The second element is true when the stored `userData` value
    /// was corrupt or a dead sentinel and must be erased by the caller.
    pub fn from_storage(
        phone_number: Option<String>,
        service_no: Option<String>,
        user_data_raw: Option<String>,
        sent_otp: Option<String>,
    ) -> (Option<Self>, bool) {
        let phone_number = non_empty(phone_number);
        let service_no = non_empty(service_no);

        if phone_number.is_none() && service_no.is_none() {
            return (None, false);
        }

        let (user_data, erase_user_data) = match user_data_raw.as_deref() {
            None => (None, false),
            Some(raw) => match Self::decode_user_data(raw) {
                Ok(Some(value)) => (Some(value), false),
                Ok(None) => (None, true),
                Err(_) => (None, true),
            },
        };

        let session = Session {
            phone_number,
            service_no,
            user_data,
            sent_otp: non_empty(sent_otp),
        };
        (Some(session), erase_user_data)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
