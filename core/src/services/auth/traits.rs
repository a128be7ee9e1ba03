//! Trait for the remote auth API consumed by the authentication service.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::entities::registration::Registration;
use crate::domain::value_objects::UserDataEnvelope;
use crate::errors::ErrorPayload;

/// Remote authentication API
///
/// Implementations talk to the auth backend; every method normalizes
/// transport and server rejections into an [`ErrorPayload`] carrying at
/// least a message. There is no retry or cancellation at this seam.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Checks whether the phone number is registered
    ///
    /// The endpoint answers with a boolean-like payload; its truthiness is
    /// the validation result.
    async fn validate_phone(&self, phone: &str) -> Result<bool, ErrorPayload>;

    /// Dispatches an OTP to the phone number
    ///
    /// The response payload is the issued OTP value itself.
    async fn dispatch_otp(&self, phone: &str) -> Result<String, ErrorPayload>;

    /// Logs in with a service number and password
    ///
    /// Returns the opaque user payload; a falsy payload means the
    /// credentials were rejected.
    async fn login_with_password(
        &self,
        service_no: &str,
        password: &str,
    ) -> Result<Value, ErrorPayload>;

    /// Fetches the profile payload for a phone number
    async fn fetch_user_data(&self, phone: &str) -> Result<UserDataEnvelope, ErrorPayload>;

    /// Registers a new user
    ///
    /// Returns whether the server reported success.
    async fn register_user(&self, registration: &Registration) -> Result<bool, ErrorPayload>;
}
