//! HTTP implementation of the remote authentication API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use gp_core::domain::entities::registration::Registration;
use gp_core::domain::value_objects::{is_truthy, UserDataEnvelope};
use gp_core::errors::ErrorPayload;
use gp_core::services::auth::{clean_phone_number, mask_phone, strip_plus, AuthApi};

use crate::api::config::ApiConfig;
use crate::error::InfraError;

/// Fallback messages surfaced when an endpoint rejects without a usable body
const VALIDATE_FALLBACK: &str = "Server Error. Unable to authenticate phone number.";
const DISPATCH_FALLBACK: &str = "Server Error. Unable to send verification call.";
const LOGIN_FALLBACK: &str = "Server Error. Unable to login.";
const USER_DATA_FALLBACK: &str = "Server Error. Unable to fetch user data.";
const REGISTER_FALLBACK: &str = "An error occurred. Please try again.";

/// Remote authentication API over HTTP
///
/// One shared `reqwest` client with a request timeout; no retries and no
/// cancellation. Every endpoint normalizes transport errors and non-2xx
/// responses into an [`ErrorPayload`] carrying the endpoint's fallback
/// message when the rejection body has no `message` of its own.
pub struct HttpAuthApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpAuthApi {
    /// Creates a client over the given configuration
    pub fn new(config: ApiConfig) -> Result<Self, InfraError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        tracing::debug!(
            event = "api_client_ready",
            base_url = %config.base_url,
            "Auth API client initialized"
        );
        Ok(Self { client, config })
    }

    /// Creates a client from environment variables
    pub fn from_env() -> Result<Self, InfraError> {
        Self::new(ApiConfig::from_env()?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<Value, ErrorPayload> {
        let request = self.client.post(self.url(path)).json(body);
        Self::execute(request, path, fallback).await
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> Result<Value, ErrorPayload> {
        let request = self.client.get(self.url(path)).query(query);
        Self::execute(request, path, fallback).await
    }

    async fn execute(
        request: reqwest::RequestBuilder,
        path: &str,
        fallback: &str,
    ) -> Result<Value, ErrorPayload> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(
                    event = "api_transport_error",
                    path,
                    error = %err,
                    "Request to auth API failed"
                );
                return Err(ErrorPayload::from_rejection(None, fallback));
            }
        };

        let status = response.status();
        let body = response.json::<Value>().await.ok();
        if !status.is_success() {
            tracing::warn!(
                event = "api_rejection",
                path,
                status = status.as_u16(),
                "Auth API rejected the request"
            );
            return Err(ErrorPayload::from_rejection(body, fallback));
        }
        Ok(body.unwrap_or(Value::Null))
    }
}

/// Renders an opaque OTP payload as the OTP value itself
///
/// The server answers the dispatch endpoint with the code as a bare string
/// or number; anything else is carried through in its JSON rendering.
fn otp_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn validate_phone(&self, phone: &str) -> Result<bool, ErrorPayload> {
        let body = json!({ "MobileNo": phone });
        let value = self
            .post_json("/UserRegister/AuthenticatePhoneNo", &body, VALIDATE_FALLBACK)
            .await?;
        Ok(is_truthy(&value))
    }

    async fn dispatch_otp(&self, phone: &str) -> Result<String, ErrorPayload> {
        // The dispatch endpoint expects the number without a leading `+`
        let body = json!({ "MobileNo": strip_plus(phone) });
        let value = self
            .post_json("/UserRegister/SendOTP", &body, DISPATCH_FALLBACK)
            .await?;
        tracing::info!(
            event = "otp_dispatch_requested",
            phone = %mask_phone(phone),
            "OTP dispatch requested"
        );
        Ok(otp_value_to_string(&value))
    }

    async fn login_with_password(
        &self,
        service_no: &str,
        password: &str,
    ) -> Result<Value, ErrorPayload> {
        self.get_json(
            "/Login/UserLogin",
            &[("serviceNo", service_no), ("password", password)],
            LOGIN_FALLBACK,
        )
        .await
    }

    async fn fetch_user_data(&self, phone: &str) -> Result<UserDataEnvelope, ErrorPayload> {
        // The user-data endpoint accepts digits and a leading `+` only
        let clean = clean_phone_number(phone);
        let body = json!({ "MobileNo": clean });
        let value = self
            .post_json("/UserRegister/GetUserData", &body, USER_DATA_FALLBACK)
            .await?;

        if is_truthy(&value) {
            Ok(UserDataEnvelope::found(value, clean))
        } else {
            Ok(UserDataEnvelope::missing())
        }
    }

    async fn register_user(&self, registration: &Registration) -> Result<bool, ErrorPayload> {
        // The register endpoint takes an array with exactly one entry
        let body = json!([registration]);
        let value = self
            .post_json("/UserRegister/PostUserDetails", &body, REGISTER_FALLBACK)
            .await?;
        Ok(value.get("success").map(is_truthy).unwrap_or(false))
    }
}
