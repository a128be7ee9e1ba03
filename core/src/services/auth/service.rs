//! Main authentication service implementation.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use crate::domain::entities::auth_state::AuthState;
use crate::domain::entities::registration::Registration;
use crate::domain::entities::session::Session;
use crate::domain::value_objects::{is_truthy, AuthOutcome};
use crate::errors::{AuthError, ErrorPayload};
use crate::repositories::session::SessionStore;

use super::config::AuthServiceConfig;
use super::phone_utils::{has_country_prefix, mask_phone, toggle_plus_prefix};
use super::traits::AuthApi;

/// Authentication service driving the client-side auth state machine
///
/// Owns the [`AuthState`] and the session store; screens invoke operations
/// and read state snapshots. Every outward-facing operation converts
/// lower-layer rejections into a structured [`AuthOutcome`] — nothing
/// propagates as an unhandled fault past this boundary.
pub struct AuthService<S: SessionStore, A: AuthApi> {
    /// Durable session storage
    session_store: Arc<S>,
    /// Remote auth API client
    api: Arc<A>,
    /// In-memory authentication state
    state: RwLock<AuthState>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<S: SessionStore, A: AuthApi> AuthService<S, A> {
    /// Creates a new authentication service
    ///
    /// # Arguments
    ///
    /// * `session_store` - Durable session storage
    /// * `api` - Remote auth API client
    /// * `config` - Service configuration
    pub fn new(session_store: Arc<S>, api: Arc<A>, config: AuthServiceConfig) -> Self {
        Self {
            session_store,
            api,
            state: RwLock::new(AuthState::initial()),
            config,
        }
    }

    /// Snapshot of the current authentication state
    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    /// Handle on the session store, shared with the verification flow
    pub fn session_store(&self) -> Arc<S> {
        Arc::clone(&self.session_store)
    }

    /// Restores a persisted session into the state machine
    ///
    /// No network call is made. Returns whether a session was restored;
    /// restoration marks the state authenticated.
    pub async fn restore_session(&self) -> bool {
        match self.session_store.restore() {
            Some(session) => {
                tracing::info!(
                    event = "session_restored",
                    phone = ?session.phone_number.as_deref().map(mask_phone),
                    service_no = ?session.service_no.as_deref(),
                    "Restored persisted session"
                );
                self.state.write().await.restore_session(&session);
                true
            }
            None => false,
        }
    }

    /// Validates a phone number and dispatches an OTP to it
    ///
    /// The number must carry the configured country prefix (with or without
    /// a leading `+`) before any network call is made. A falsy validation
    /// response fails the attempt; otherwise the OTP endpoint is called and
    /// the outcome carries the issued OTP payload. A successful phone
    /// authentication does not mark the state authenticated — only session
    /// restoration and password login do.
    pub async fn authenticate_by_phone(&self, phone_number: &str) -> AuthOutcome {
        self.state.write().await.begin_attempt();

        let phone_number = phone_number.trim();
        if !has_country_prefix(phone_number, &self.config.required_country_prefix) {
            tracing::warn!(
                event = "phone_prefix_rejected",
                phone = %mask_phone(phone_number),
                "Phone number rejected before any network call"
            );
            return self.fail(AuthError::InvalidPhoneNumber.into()).await;
        }

        match self.api.validate_phone(phone_number).await {
            Ok(true) => {}
            Ok(false) => {
                return self.fail(AuthError::InvalidPhoneNumber.into()).await;
            }
            Err(payload) => {
                return self.fail(payload).await;
            }
        }

        match self.api.dispatch_otp(phone_number).await {
            Ok(otp) => {
                tracing::info!(
                    event = "otp_dispatched",
                    phone = %mask_phone(phone_number),
                    "OTP dispatched for phone authentication"
                );
                self.state.write().await.phone_auth_success(phone_number);
                AuthOutcome::success(Value::String(otp))
            }
            Err(payload) => self.fail(payload).await,
        }
    }

    /// Phone authentication with the two-attempt format policy
    ///
    /// Tries the number as given; on failure, retries once with the
    /// opposite `+`-prefix convention. Failure is surfaced only when both
    /// attempts fail. The caller keeps its own phone format; the outcome
    /// carries whichever attempt's OTP succeeded.
    pub async fn authenticate_by_phone_with_fallback(&self, phone_number: &str) -> AuthOutcome {
        let phone_number = phone_number.trim();
        let first = self.authenticate_by_phone(phone_number).await;
        if first.success || !self.config.dual_format_retry {
            return first;
        }

        let alternate = toggle_plus_prefix(phone_number);
        tracing::debug!(
            event = "phone_format_retry",
            phone = %mask_phone(&alternate),
            "Retrying authentication with the opposite prefix format"
        );
        self.authenticate_by_phone(&alternate).await
    }

    /// Logs in with a service number and password
    ///
    /// A falsy response payload is an invalid-credentials failure. On
    /// success the state is marked authenticated and the service number and
    /// user payload are persisted to the session store.
    pub async fn authenticate_by_password(
        &self,
        service_no: &str,
        password: &str,
    ) -> AuthOutcome {
        self.state.write().await.begin_attempt();

        let service_no = service_no.trim();
        match self.api.login_with_password(service_no, password).await {
            Ok(payload) if is_truthy(&payload) => {
                tracing::info!(
                    event = "password_auth_success",
                    service_no = service_no,
                    "Password authentication succeeded"
                );
                self.state
                    .write()
                    .await
                    .password_auth_success(service_no, payload.clone());
                self.session_store.persist(
                    &Session::new()
                        .with_service_no(service_no)
                        .with_user_data(payload.clone()),
                );
                AuthOutcome::success(payload)
            }
            Ok(_) => self.fail(AuthError::InvalidCredentials.into()).await,
            Err(payload) => self.fail(payload).await,
        }
    }

    /// Dispatches a fresh OTP for an in-flight verification
    ///
    /// Fire-and-report: the state machine's `loading`/`error` fields are
    /// not touched, success or failure.
    pub async fn resend_otp(&self, phone_number: &str) -> AuthOutcome {
        match self.api.dispatch_otp(phone_number).await {
            Ok(otp) => AuthOutcome::success(Value::String(otp)),
            Err(payload) => {
                tracing::warn!(
                    event = "otp_resend_failed",
                    phone = %mask_phone(phone_number),
                    message = %payload.message,
                    "OTP resend failed"
                );
                AuthOutcome::failure(payload)
            }
        }
    }

    /// Fetches the profile payload for a phone number into the state
    pub async fn load_user_data(&self, phone_number: &str) -> AuthOutcome {
        match self.api.fetch_user_data(phone_number).await {
            Ok(envelope) => {
                let payload = match serde_json::to_value(&envelope) {
                    Ok(value) => value,
                    Err(err) => {
                        tracing::error!(
                            event = "user_data_encode_failed",
                            error = %err,
                            "Could not encode user data envelope"
                        );
                        Value::Null
                    }
                };
                self.state.write().await.user_data_loaded(payload.clone());
                AuthOutcome::success(payload)
            }
            Err(payload) => {
                self.state.write().await.user_data_failed(payload.clone());
                AuthOutcome::failure(payload)
            }
        }
    }

    /// Overwrites the cached profile payload in the state
    pub async fn set_user_data(&self, payload: Option<Value>) {
        self.state.write().await.set_user_data(payload);
    }

    /// Registers a new user
    ///
    /// The form is validated locally first; the endpoint then reports
    /// success through a boolean flag. The state machine is not involved.
    pub async fn register(&self, registration: &Registration) -> AuthOutcome {
        if let Err(err) = registration.validate() {
            return AuthOutcome::failure(err.into());
        }

        match self.api.register_user(registration).await {
            Ok(true) => {
                tracing::info!(
                    event = "registration_success",
                    service_no = %registration.service_no,
                    "User registered"
                );
                AuthOutcome::success(Value::Bool(true))
            }
            Ok(false) => AuthOutcome::failure(
                AuthError::InvalidRegistration {
                    reason: "Registration failed. Please check your details.".to_string(),
                }
                .into(),
            ),
            Err(_) => AuthOutcome::failure(
                AuthError::NetworkOrServer {
                    message: "An error occurred. Please try again.".to_string(),
                }
                .into(),
            ),
        }
    }

    /// Logs out: clears the session store and resets the state machine
    pub async fn logout(&self) {
        tracing::info!(event = "logout", "Clearing session and resetting auth state");
        self.session_store.clear();
        self.state.write().await.reset();
    }

    async fn fail(&self, payload: ErrorPayload) -> AuthOutcome {
        self.state.write().await.fail(payload.clone());
        AuthOutcome::failure(payload)
    }
}
