//! In-memory authentication state owned by the auth service.

use serde_json::Value;

use crate::domain::entities::session::Session;
use crate::errors::ErrorPayload;

/// Transient representation of the current authentication attempt
///
/// Owned exclusively by the auth service; screens only ever see snapshots.
/// Lives for the process lifetime, or until a logout resets it.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    /// True while a remote call is in flight
    pub loading: bool,

    /// Failure payload of the last attempt, if any
    pub error: Option<ErrorPayload>,

    /// Last successful phone number or service number echoed back
    pub data: Option<String>,

    /// Last fetched or returned profile payload
    pub user_data: Option<Value>,

    /// Set only when a persisted session is restored or a password login
    /// succeeds. Completing the phone/OTP step alone does not flip it.
    pub is_authenticated: bool,

    /// Phone number of the active or restored identity
    pub phone_number: Option<String>,

    /// Service number of the active or restored identity
    pub service_no: Option<String>,
}

impl AuthState {
    /// The initial state
    pub fn initial() -> Self {
        Self::default()
    }

    /// Marks the start of an authentication attempt
    pub fn begin_attempt(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Applies a restored session
    pub fn restore_session(&mut self, session: &Session) {
        self.is_authenticated = true;
        self.phone_number = session.phone_number.clone();
        self.service_no = session.service_no.clone();
        self.user_data = session.user_data.clone();
        self.data = session
            .phone_number
            .clone()
            .or_else(|| session.service_no.clone());
        self.loading = false;
        self.error = None;
    }

    /// Records a successful phone authentication
    ///
    /// Does not touch `is_authenticated`; only session restoration and
    /// password login do.
    pub fn phone_auth_success(&mut self, phone_number: &str) {
        self.loading = false;
        self.data = Some(phone_number.to_string());
        self.error = None;
    }

    /// Records a successful password authentication
    pub fn password_auth_success(&mut self, service_no: &str, user_data: Value) {
        self.loading = false;
        self.is_authenticated = true;
        self.service_no = Some(service_no.to_string());
        self.user_data = Some(user_data);
        self.error = None;
    }

    /// Records a failed attempt
    pub fn fail(&mut self, payload: ErrorPayload) {
        self.loading = false;
        self.error = Some(payload);
    }

    /// Records a successful profile fetch
    pub fn user_data_loaded(&mut self, payload: Value) {
        self.user_data = Some(payload);
        self.loading = false;
        self.error = None;
    }

    /// Records a failed profile fetch
    pub fn user_data_failed(&mut self, payload: ErrorPayload) {
        self.user_data = None;
        self.loading = false;
        self.error = Some(payload);
    }

    /// Overwrites the cached profile payload
    pub fn set_user_data(&mut self, payload: Option<Value>) {
        self.user_data = payload;
    }

    /// Resets to the initial state
    pub fn reset(&mut self) {
        *self = Self::initial();
    }
}
