//! Error taxonomy for authentication and verification operations.

mod types;

pub use types::ErrorPayload;

use thiserror::Error;

/// Authentication and verification errors
///
/// Display strings double as the user-facing messages surfaced by the
/// screens, so they are worded exactly as shown to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Invalid phone number.")]
    InvalidPhoneNumber,

    #[error("Invalid credentials.")]
    InvalidCredentials,

    #[error("Invalid OTP. Please try again.")]
    InvalidOtp,

    #[error("OTP time expired. Please request a new OTP.")]
    OtpExpired,

    #[error("{message}")]
    NetworkOrServer { message: String },

    /// Recovered silently on session restore; logged, never shown.
    #[error("Stored user data could not be parsed")]
    CorruptSessionData,

    /// Verification flow entered without a phone number and issued OTP.
    #[error("Invalid access. Redirecting to login.")]
    InvalidAccess,

    #[error("{reason}")]
    InvalidRegistration { reason: String },
}

impl AuthError {
    /// Stable error code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidPhoneNumber => "INVALID_PHONE_NUMBER",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidOtp => "INVALID_OTP",
            AuthError::OtpExpired => "OTP_EXPIRED",
            AuthError::NetworkOrServer { .. } => "NETWORK_OR_SERVER_ERROR",
            AuthError::CorruptSessionData => "CORRUPT_SESSION_DATA",
            AuthError::InvalidAccess => "INVALID_ACCESS",
            AuthError::InvalidRegistration { .. } => "INVALID_REGISTRATION",
        }
    }
}

pub type CoreResult<T> = Result<T, AuthError>;
