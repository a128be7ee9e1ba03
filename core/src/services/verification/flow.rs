//! Verification flow service running one timed OTP challenge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::domain::entities::otp_challenge::{ExpiryTick, OtpChallenge};
use crate::domain::entities::session::Session;
use crate::domain::value_objects::normalize_user_data;
use crate::errors::AuthError;
use crate::repositories::session::SessionStore;
use crate::services::auth::{mask_phone, AuthApi, AuthService};

use super::config::VerificationConfig;
use super::events::VerificationEvent;

/// Shown when a resend fails without a server message
const RESEND_FALLBACK_MESSAGE: &str = "Failed to resend OTP.";

/// Cancellable handle on a one-second countdown task
///
/// Cancelling is idempotent, and dropping the handle aborts the task, so a
/// flow going out of scope cannot leak its tickers.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    /// Stops the countdown
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Whether the countdown task has ended, by completion or cancellation
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// One verification screen visit: a timed OTP challenge plus its timers
///
/// Owns the [`OtpChallenge`] and the two countdowns that drive it. Screen
/// input is forwarded through [`enter_digit`](Self::enter_digit),
/// [`backspace`](Self::backspace), [`submit`](Self::submit) and
/// [`resend`](Self::resend); everything the screen renders in response
/// arrives on the event channel returned by [`start`](Self::start).
///
/// At most one expiry countdown and one resend cooldown run per instance.
/// Navigating away must call [`teardown`](Self::teardown); dropping the
/// flow stops the timers as well.
pub struct VerificationFlow<S: SessionStore, A: AuthApi> {
    challenge: Arc<Mutex<OtpChallenge>>,
    auth: Arc<AuthService<S, A>>,
    store: Arc<S>,
    config: VerificationConfig,
    events: UnboundedSender<VerificationEvent>,
    expiry_countdown: Mutex<Option<CountdownHandle>>,
    resend_countdown: Mutex<Option<CountdownHandle>>,
    verifying: AtomicBool,
}

impl<S: SessionStore, A: AuthApi> VerificationFlow<S, A> {
    /// Starts a verification flow for an issued OTP
    ///
    /// Hard precondition: both the phone number and the issued OTP must be
    /// non-empty, otherwise the flow signals [`AuthError::InvalidAccess`]
    /// and the caller navigates back to the login entry point. On success
    /// the expiry countdown starts immediately and events begin arriving on
    /// the returned receiver.
    pub fn start(
        phone_number: impl Into<String>,
        sent_otp: impl Into<String>,
        user_data: Option<Value>,
        auth: Arc<AuthService<S, A>>,
        config: VerificationConfig,
    ) -> Result<(Self, UnboundedReceiver<VerificationEvent>), AuthError> {
        let phone_number = phone_number.into();
        let sent_otp = sent_otp.into();
        if phone_number.is_empty() || sent_otp.is_empty() {
            tracing::warn!(
                event = "verification_invalid_access",
                "Verification flow entered without a phone number and issued OTP"
            );
            return Err(AuthError::InvalidAccess);
        }

        tracing::info!(
            event = "verification_started",
            phone = %mask_phone(&phone_number),
            expiry_secs = config.initial_expiry_secs,
            "Verification flow started"
        );

        let challenge = Arc::new(Mutex::new(OtpChallenge::new_with_expiry(
            phone_number,
            sent_otp,
            user_data,
            config.initial_expiry_secs,
        )));
        let (events, receiver) = mpsc::unbounded_channel();

        let flow = Self {
            store: auth.session_store(),
            challenge,
            auth,
            config,
            events,
            expiry_countdown: Mutex::new(None),
            resend_countdown: Mutex::new(None),
            verifying: AtomicBool::new(false),
        };
        flow.restart_expiry_countdown();

        Ok((flow, receiver))
    }

    /// Snapshot of the challenge state
    pub fn challenge(&self) -> OtpChallenge {
        lock(&self.challenge).clone()
    }

    /// True while a matching submission sits in its verification delay
    pub fn is_verifying(&self) -> bool {
        self.verifying.load(Ordering::SeqCst)
    }

    /// Forwards a digit entry to the challenge; returns whether it was
    /// accepted
    pub fn enter_digit(&self, slot: usize, value: char) -> bool {
        lock(&self.challenge).enter_digit(slot, value)
    }

    /// Forwards a backspace to the challenge
    pub fn backspace(&self, slot: usize) {
        lock(&self.challenge).backspace(slot);
    }

    /// Submits the entered digits
    ///
    /// An empty or mismatched concatenation emits
    /// [`VerificationEvent::InvalidOtp`] and changes nothing; the session
    /// store is not touched. A match enters a transient verifying state for
    /// the configured latency, persists the phone number, issued OTP and
    /// profile payload, stops the expiry countdown, and emits
    /// [`VerificationEvent::OtpVerified`] followed by
    /// [`VerificationEvent::Completed`]. The latency cannot be cancelled
    /// once started.
    pub async fn submit(&self) {
        let matched = {
            let challenge = lock(&self.challenge);
            challenge.matches(&challenge.entered_otp())
        };
        if !matched {
            tracing::debug!(event = "otp_rejected", "Submitted OTP did not match");
            let _ = self.events.send(VerificationEvent::InvalidOtp);
            return;
        }

        self.verifying.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.config.verify_latency).await;

        let (phone_number, sent_otp, user_data) = {
            let challenge = lock(&self.challenge);
            (
                challenge.phone_number.clone(),
                challenge.expected_otp().to_string(),
                challenge.user_data.clone(),
            )
        };

        let mut session = Session::new()
            .with_phone_number(phone_number.clone())
            .with_sent_otp(sent_otp);
        if let Some(user_data) = user_data.clone() {
            session = session.with_user_data(user_data);
        }
        self.store.persist(&session);

        if let Some(handle) = lock(&self.expiry_countdown).take() {
            handle.cancel();
        }
        self.verifying.store(false, Ordering::SeqCst);

        tracing::info!(
            event = "otp_verified",
            phone = %mask_phone(&phone_number),
            "OTP verified and session persisted"
        );
        let _ = self.events.send(VerificationEvent::OtpVerified);
        let _ = self.events.send(VerificationEvent::Completed {
            phone_number,
            user_data: normalize_user_data(user_data.as_ref()),
        });
    }

    /// Requests a fresh OTP for the challenge
    ///
    /// The resend affordance is hidden and the cooldown armed before the
    /// call is made, so a failed or still-pending resend locks the
    /// affordance for the full window. A successful resend resets the
    /// expiry window, unblocks the challenge, clears every digit slot, and
    /// swaps in the newly issued OTP.
    pub async fn resend(&self) {
        let phone_number = {
            let mut challenge = lock(&self.challenge);
            challenge.begin_resend_cooldown(self.config.resend_cooldown_secs);
            challenge.phone_number.clone()
        };
        self.restart_resend_countdown();

        let outcome = self.auth.resend_otp(&phone_number).await;
        let new_otp = outcome
            .data
            .as_ref()
            .and_then(Value::as_str)
            .filter(|otp| !otp.is_empty());

        match new_otp {
            Some(new_otp) if outcome.success => {
                lock(&self.challenge).apply_resend(new_otp, self.config.resend_expiry_secs);
                self.restart_expiry_countdown();
                tracing::info!(
                    event = "otp_resent",
                    phone = %mask_phone(&phone_number),
                    "OTP resent and challenge reset"
                );
                let _ = self.events.send(VerificationEvent::ResendSucceeded);
            }
            _ => {
                let message = outcome
                    .error
                    .map(|payload| payload.message)
                    .unwrap_or_else(|| RESEND_FALLBACK_MESSAGE.to_string());
                let _ = self.events.send(VerificationEvent::ResendFailed { message });
            }
        }
    }

    /// Stops both countdowns
    ///
    /// Called when the verification screen is left. Dropping the flow has
    /// the same effect through the handles' `Drop`.
    pub fn teardown(&self) {
        if let Some(handle) = lock(&self.expiry_countdown).take() {
            handle.cancel();
        }
        if let Some(handle) = lock(&self.resend_countdown).take() {
            handle.cancel();
        }
        tracing::debug!(event = "verification_teardown", "Verification flow torn down");
    }

    fn restart_expiry_countdown(&self) {
        let challenge = Arc::clone(&self.challenge);
        let events = self.events.clone();
        let tick_interval = self.config.tick_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match lock(&challenge).tick_expiry() {
                    ExpiryTick::Counting(_) => {}
                    ExpiryTick::JustExpired => {
                        let _ = events.send(VerificationEvent::Expired);
                        break;
                    }
                    ExpiryTick::Idle => break,
                }
            }
        });
        *lock(&self.expiry_countdown) = Some(CountdownHandle::new(task));
    }

    fn restart_resend_countdown(&self) {
        let challenge = Arc::clone(&self.challenge);
        let events = self.events.clone();
        let tick_interval = self.config.tick_interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if lock(&challenge).tick_resend_cooldown() {
                    let _ = events.send(VerificationEvent::ResendAvailable);
                    break;
                }
            }
        });
        *lock(&self.resend_countdown) = Some(CountdownHandle::new(task));
    }
}

impl<S: SessionStore, A: AuthApi> Drop for VerificationFlow<S, A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
