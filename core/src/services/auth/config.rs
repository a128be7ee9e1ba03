//! Configuration for the authentication service.

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// Country prefix a phone number must carry before any network call
    pub required_country_prefix: String,
    /// Whether a failed phone authentication retries the opposite
    /// `+`-prefix format before surfacing the failure
    pub dual_format_retry: bool,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            required_country_prefix: "94".to_string(),
            dual_format_retry: true,
        }
    }
}
