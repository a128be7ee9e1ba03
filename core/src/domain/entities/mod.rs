//! Domain entities representing core business objects.

pub mod auth_state;
pub mod otp_challenge;
pub mod registration;
pub mod session;

// Re-export commonly used types
pub use auth_state::AuthState;
pub use otp_challenge::{
    ExpiryTick, OtpChallenge, INITIAL_EXPIRY_SECS, OTP_LENGTH, RESEND_COOLDOWN_SECS,
    RESEND_EXPIRY_SECS, VERIFY_LATENCY_SECS,
};
pub use registration::{Registration, MOBILE_NO_MAX_LEN};
pub use session::{Session, KEY_PHONE_NUMBER, KEY_SENT_OTP, KEY_SERVICE_NO, KEY_USER_DATA};
