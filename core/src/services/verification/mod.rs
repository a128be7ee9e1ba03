//! OTP verification flow module
//!
//! Runs one timed challenge per verification screen visit:
//! - Digit entry with focus tracking
//! - Expiry countdown and blocking
//! - Submission with simulated verification latency
//! - Resend with an unconditional cooldown
//!
//! Both countdowns are explicit cancellable timer handles owned by the flow
//! instance; tearing the flow down stops them.

mod config;
mod events;
mod flow;

#[cfg(test)]
mod tests;

pub use config::VerificationConfig;
pub use events::VerificationEvent;
pub use flow::{CountdownHandle, VerificationFlow};
