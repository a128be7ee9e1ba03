//! Events emitted by the verification flow

use serde_json::Value;

/// Notification emitted by a verification flow instance
///
/// These are the signals the verification screen renders: transient
/// notifications, the resend affordance toggle, and the completion signal
/// that carries navigation onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationEvent {
    /// The OTP expired; the challenge is now blocked. Emitted exactly once
    /// per expiry.
    Expired,
    /// A submission did not match the issued OTP
    InvalidOtp,
    /// A submission matched and the session was persisted
    OtpVerified,
    /// Navigation onward, with the phone number and normalized profile data
    Completed {
        phone_number: String,
        user_data: Option<Value>,
    },
    /// A resend call succeeded and the challenge was reset
    ResendSucceeded,
    /// A resend call failed; carries the server message or a fallback
    ResendFailed { message: String },
    /// The resend cooldown elapsed; the affordance is available again
    ResendAvailable,
}
