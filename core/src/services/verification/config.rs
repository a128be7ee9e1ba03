//! Configuration for the verification flow

use std::time::Duration;

use crate::domain::entities::otp_challenge::{
    INITIAL_EXPIRY_SECS, RESEND_COOLDOWN_SECS, RESEND_EXPIRY_SECS, VERIFY_LATENCY_SECS,
};

/// Configuration for the verification flow
#[derive(Debug, Clone)]
pub struct VerificationConfig {
    /// Seconds before a freshly issued OTP expires
    pub initial_expiry_secs: u32,
    /// Seconds before a re-issued OTP expires
    pub resend_expiry_secs: u32,
    /// Cooldown before the resend affordance is shown again
    pub resend_cooldown_secs: u32,
    /// Simulated latency applied to a matching submission
    pub verify_latency: Duration,
    /// Interval between countdown ticks
    pub tick_interval: Duration,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            initial_expiry_secs: INITIAL_EXPIRY_SECS,
            resend_expiry_secs: RESEND_EXPIRY_SECS,
            resend_cooldown_secs: RESEND_COOLDOWN_SECS,
            verify_latency: Duration::from_secs(VERIFY_LATENCY_SECS),
            tick_interval: Duration::from_secs(1),
        }
    }
}
