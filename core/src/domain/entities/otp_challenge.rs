//! OTP challenge entity for the verification screen's timed state machine.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde_json::Value;
use uuid::Uuid;

/// Number of OTP digit slots
pub const OTP_LENGTH: usize = 5;

/// Seconds until a freshly issued OTP expires
pub const INITIAL_EXPIRY_SECS: u32 = 120;

/// Seconds until a re-issued OTP expires
pub const RESEND_EXPIRY_SECS: u32 = 90;

/// Cooldown before the resend affordance is shown again
pub const RESEND_COOLDOWN_SECS: u32 = 30;

/// Simulated latency applied to a matching submission, in seconds
pub const VERIFY_LATENCY_SECS: u64 = 2;

/// Outcome of one expiry countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryTick {
    /// Countdown still running; carries the remaining seconds
    Counting(u32),
    /// This tick reached zero and blocked the challenge
    JustExpired,
    /// The challenge was already blocked; nothing to do
    Idle,
}

/// One instance of the OTP verification flow
///
/// Scoped to a single phone number and issued OTP value. Holds the entered
/// digit slots, the expiry countdown, and the resend cooldown. All methods
/// are pure state transitions; the timers that drive the tick methods live
/// in the verification flow service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpChallenge {
    /// Unique identifier for this challenge instance
    pub id: Uuid,

    /// Phone number the OTP was dispatched to
    pub phone_number: String,

    /// Profile payload carried over from the login step, persisted on success
    pub user_data: Option<Value>,

    /// Timestamp when the challenge was created
    pub created_at: DateTime<Utc>,

    expected_otp: String,
    digits: [Option<char>; OTP_LENGTH],
    focused_slot: usize,
    expiry_remaining_secs: u32,
    blocked: bool,
    resend_cooldown_remaining_secs: u32,
    resend_available: bool,
}

impl OtpChallenge {
    /// Creates a challenge with the default expiry window
    pub fn new(
        phone_number: impl Into<String>,
        expected_otp: impl Into<String>,
        user_data: Option<Value>,
    ) -> Self {
        Self::new_with_expiry(phone_number, expected_otp, user_data, INITIAL_EXPIRY_SECS)
    }

    /// Creates a challenge with a custom expiry window
    pub fn new_with_expiry(
        phone_number: impl Into<String>,
        expected_otp: impl Into<String>,
        user_data: Option<Value>,
        expiry_secs: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            phone_number: phone_number.into(),
            user_data,
            created_at: Utc::now(),
            expected_otp: expected_otp.into(),
            digits: Default::default(),
            focused_slot: 0,
            expiry_remaining_secs: expiry_secs,
            blocked: false,
            resend_cooldown_remaining_secs: 0,
            resend_available: true,
        }
    }

    /// The OTP value the server issued
    pub fn expected_otp(&self) -> &str {
        &self.expected_otp
    }

    /// The entered digit slots
    pub fn digits(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.digits
    }

    /// Index of the slot that currently has focus
    pub fn focused_slot(&self) -> usize {
        self.focused_slot
    }

    /// Remaining seconds on the expiry countdown
    pub fn expiry_remaining_secs(&self) -> u32 {
        self.expiry_remaining_secs
    }

    /// True once the expiry countdown has reached zero
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Remaining seconds on the resend cooldown
    pub fn resend_cooldown_remaining_secs(&self) -> u32 {
        self.resend_cooldown_remaining_secs
    }

    /// Whether the resend affordance is currently shown
    pub fn is_resend_available(&self) -> bool {
        self.resend_available
    }

    /// Enters a digit into a slot
    ///
    /// Non-digit input is rejected without touching any state. A stored
    /// digit advances focus to the next slot unless the slot is the last.
    /// Returns whether the input was accepted.
    pub fn enter_digit(&mut self, slot: usize, value: char) -> bool {
        if slot >= OTP_LENGTH || !value.is_ascii_digit() {
            return false;
        }
        self.digits[slot] = Some(value);
        if slot < OTP_LENGTH - 1 {
            self.focused_slot = slot + 1;
        } else {
            self.focused_slot = slot;
        }
        true
    }

    /// Handles a backspace in a slot
    ///
    /// An occupied slot is cleared in place; backspacing an empty slot moves
    /// focus to the previous slot, with slot 0 as a no-op.
    pub fn backspace(&mut self, slot: usize) {
        if slot >= OTP_LENGTH {
            return;
        }
        if self.digits[slot].is_some() {
            self.digits[slot] = None;
            self.focused_slot = slot;
        } else if slot > 0 {
            self.focused_slot = slot - 1;
        }
    }

    /// Concatenation of all entered digits
    pub fn entered_otp(&self) -> String {
        self.digits.iter().flatten().collect()
    }

    /// Whether the given input matches the issued OTP
    ///
    /// Empty input never matches. Comparison is constant-time.
    pub fn matches(&self, input: &str) -> bool {
        if input.is_empty() || input.len() != self.expected_otp.len() {
            return false;
        }
        constant_time_eq(input.as_bytes(), self.expected_otp.as_bytes())
    }

    /// Advances the expiry countdown by one second
    ///
    /// The tick that reaches zero blocks the challenge and reports
    /// [`ExpiryTick::JustExpired`] exactly once; every tick after that is
    /// [`ExpiryTick::Idle`].
    pub fn tick_expiry(&mut self) -> ExpiryTick {
        if self.blocked || self.expiry_remaining_secs == 0 {
            return ExpiryTick::Idle;
        }
        self.expiry_remaining_secs -= 1;
        if self.expiry_remaining_secs == 0 {
            self.blocked = true;
            ExpiryTick::JustExpired
        } else {
            ExpiryTick::Counting(self.expiry_remaining_secs)
        }
    }

    /// Hides the resend affordance and arms the cooldown
    pub fn begin_resend_cooldown(&mut self, cooldown_secs: u32) {
        self.resend_available = false;
        self.resend_cooldown_remaining_secs = cooldown_secs;
    }

    /// Advances the resend cooldown by one second
    ///
    /// Returns true exactly when the cooldown reaches zero and the resend
    /// affordance is revealed again.
    pub fn tick_resend_cooldown(&mut self) -> bool {
        if self.resend_cooldown_remaining_secs == 0 {
            return false;
        }
        self.resend_cooldown_remaining_secs -= 1;
        if self.resend_cooldown_remaining_secs == 0 {
            self.resend_available = true;
            true
        } else {
            false
        }
    }

    /// Applies a successful resend
    ///
    /// Resets the expiry window, unblocks the challenge, clears every digit
    /// slot, and replaces the issued OTP with the newly dispatched value.
    pub fn apply_resend(&mut self, new_otp: impl Into<String>, expiry_secs: u32) {
        self.expected_otp = new_otp.into();
        self.expiry_remaining_secs = expiry_secs;
        self.blocked = false;
        self.digits = Default::default();
        self.focused_slot = 0;
    }

    /// Renders the expiry countdown as `m:ss`
    pub fn format_remaining(&self) -> String {
        let mins = self.expiry_remaining_secs / 60;
        let secs = self.expiry_remaining_secs % 60;
        format!("{}:{:02}", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn challenge() -> OtpChallenge {
        OtpChallenge::new("+94771234567", "48213", None)
    }

    #[test]
    fn test_new_challenge() {
        let ch = challenge();
        assert_eq!(ch.expiry_remaining_secs(), INITIAL_EXPIRY_SECS);
        assert!(!ch.is_blocked());
        assert!(ch.is_resend_available());
        assert_eq!(ch.focused_slot(), 0);
        assert_eq!(ch.entered_otp(), "");
        assert_eq!(ch.digits().len(), OTP_LENGTH);
    }

    #[test]
    fn test_enter_digit_advances_focus() {
        let mut ch = challenge();
        assert!(ch.enter_digit(0, '4'));
        assert_eq!(ch.focused_slot(), 1);
        assert!(ch.enter_digit(1, '8'));
        assert_eq!(ch.focused_slot(), 2);
    }

    #[test]
    fn test_enter_digit_at_last_slot_keeps_focus() {
        let mut ch = challenge();
        assert!(ch.enter_digit(OTP_LENGTH - 1, '3'));
        assert_eq!(ch.focused_slot(), OTP_LENGTH - 1);
    }

    #[test]
    fn test_enter_digit_rejects_non_numeric() {
        let mut ch = challenge();
        assert!(!ch.enter_digit(0, 'a'));
        assert!(!ch.enter_digit(0, '+'));
        assert_eq!(ch.entered_otp(), "");
        assert_eq!(ch.focused_slot(), 0);
    }

    #[test]
    fn test_enter_digit_out_of_range_slot() {
        let mut ch = challenge();
        assert!(!ch.enter_digit(OTP_LENGTH, '1'));
    }

    #[test]
    fn test_backspace_clears_occupied_slot_in_place() {
        let mut ch = challenge();
        ch.enter_digit(0, '4');
        ch.backspace(0);
        assert_eq!(ch.digits()[0], None);
        assert_eq!(ch.focused_slot(), 0);
    }

    #[test]
    fn test_backspace_on_empty_slot_moves_focus_back() {
        let mut ch = challenge();
        ch.enter_digit(0, '4');
        ch.enter_digit(1, '8');
        ch.backspace(2);
        assert_eq!(ch.focused_slot(), 1);
    }

    #[test]
    fn test_backspace_at_first_slot_is_noop() {
        let mut ch = challenge();
        ch.backspace(0);
        assert_eq!(ch.focused_slot(), 0);
    }

    #[test]
    fn test_entered_otp_skips_empty_slots() {
        let mut ch = challenge();
        ch.enter_digit(0, '4');
        ch.enter_digit(2, '2');
        assert_eq!(ch.entered_otp(), "42");
    }

    #[test]
    fn test_matches() {
        let mut ch = challenge();
        for (slot, d) in "48213".chars().enumerate() {
            ch.enter_digit(slot, d);
        }
        assert!(ch.matches(&ch.entered_otp()));
        assert!(!ch.matches("48214"));
        assert!(!ch.matches("4821"));
        assert!(!ch.matches(""));
    }

    #[test]
    fn test_tick_expiry_counts_down() {
        let mut ch = challenge();
        assert_eq!(ch.tick_expiry(), ExpiryTick::Counting(INITIAL_EXPIRY_SECS - 1));
        assert_eq!(ch.expiry_remaining_secs(), INITIAL_EXPIRY_SECS - 1);
    }

    #[test]
    fn test_tick_expiry_blocks_exactly_once() {
        let mut ch = OtpChallenge::new_with_expiry("+94771234567", "48213", None, 1);
        assert_eq!(ch.tick_expiry(), ExpiryTick::JustExpired);
        assert!(ch.is_blocked());
        assert_eq!(ch.tick_expiry(), ExpiryTick::Idle);
        assert_eq!(ch.tick_expiry(), ExpiryTick::Idle);
    }

    #[test]
    fn test_resend_cooldown_reveals_affordance_once() {
        let mut ch = challenge();
        ch.begin_resend_cooldown(2);
        assert!(!ch.is_resend_available());
        assert!(!ch.tick_resend_cooldown());
        assert!(ch.tick_resend_cooldown());
        assert!(ch.is_resend_available());
        assert!(!ch.tick_resend_cooldown());
    }

    #[test]
    fn test_apply_resend_resets_challenge() {
        let mut ch = OtpChallenge::new_with_expiry("+94771234567", "48213", None, 1);
        for (slot, d) in "48213".chars().enumerate() {
            ch.enter_digit(slot, d);
        }
        assert_eq!(ch.tick_expiry(), ExpiryTick::JustExpired);

        ch.apply_resend("90210", RESEND_EXPIRY_SECS);

        assert_eq!(ch.expiry_remaining_secs(), RESEND_EXPIRY_SECS);
        assert!(!ch.is_blocked());
        assert_eq!(ch.entered_otp(), "");
        assert_eq!(ch.focused_slot(), 0);
        assert_eq!(ch.expected_otp(), "90210");
        assert!(ch.matches("90210"));
    }

    #[test]
    fn test_format_remaining() {
        let ch = challenge();
        assert_eq!(ch.format_remaining(), "2:00");
        let mut ch = OtpChallenge::new_with_expiry("+94771234567", "48213", None, 65);
        assert_eq!(ch.format_remaining(), "1:05");
        ch.tick_expiry();
        assert_eq!(ch.format_remaining(), "1:04");
    }

    #[test]
    fn test_user_data_carried_through() {
        let ch = OtpChallenge::new(
            "+94771234567",
            "48213",
            Some(json!({"ResultSet": [{"Name": "Kasun"}]})),
        );
        assert!(ch.user_data.is_some());
    }
}
