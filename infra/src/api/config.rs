//! Configuration for the remote authentication API client.

use crate::error::InfraError;

/// Base URL of the production authentication backend
const DEFAULT_BASE_URL: &str = "https://daladamaligawa.dockyardsoftware.com";

/// Default timeout for API requests in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Remote API client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL the endpoint paths are appended to
    pub base_url: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ApiConfig {
    /// Create configuration from environment variables
    ///
    /// `GATEPASS_API_BASE_URL` overrides the production base URL and
    /// `GATEPASS_API_TIMEOUT_SECS` the request timeout; both fall back to
    /// the defaults when unset.
    pub fn from_env() -> Result<Self, InfraError> {
        let base_url = std::env::var("GATEPASS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(InfraError::Config(format!(
                "GATEPASS_API_BASE_URL must be an http(s) URL, got {base_url}"
            )));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: std::env::var("GATEPASS_API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        })
    }
}
