//! In-memory session store.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entities::session::{
    Session, KEY_PHONE_NUMBER, KEY_SENT_OTP, KEY_SERVICE_NO, KEY_USER_DATA,
};

use super::trait_::SessionStore;

/// Session store over an in-memory key/value map
///
/// Holds the same raw string entries a durable backend would, so legacy and
/// corrupt values can be planted with [`seed_raw`](Self::seed_raw). Serves
/// both as the test substitute for the durable store and as the fallback
/// for hosts without persistence.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Plants a raw storage string, bypassing serialization
    pub fn seed_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.lock().insert(key.into(), value.into());
    }

    /// Reads a raw storage string
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn restore(&self) -> Option<Session> {
        let mut entries = self.lock();
        let (session, erase_user_data) = Session::from_storage(
            entries.get(KEY_PHONE_NUMBER).cloned(),
            entries.get(KEY_SERVICE_NO).cloned(),
            entries.get(KEY_USER_DATA).cloned(),
            entries.get(KEY_SENT_OTP).cloned(),
        );
        if erase_user_data {
            tracing::warn!(
                event = "corrupt_session_data",
                "Stored user data was unusable; erasing it"
            );
            entries.remove(KEY_USER_DATA);
        }
        session
    }

    fn persist(&self, session: &Session) {
        let mut entries = self.lock();
        if let Some(phone_number) = &session.phone_number {
            entries.insert(KEY_PHONE_NUMBER.to_string(), phone_number.clone());
        }
        if let Some(service_no) = &session.service_no {
            entries.insert(KEY_SERVICE_NO.to_string(), service_no.clone());
        }
        if let Some(user_data) = &session.user_data {
            entries.insert(KEY_USER_DATA.to_string(), Session::encode_user_data(user_data));
        }
        if let Some(sent_otp) = &session.sent_otp {
            entries.insert(KEY_SENT_OTP.to_string(), sent_otp.clone());
        }
    }

    fn clear(&self) {
        let mut entries = self.lock();
        for key in [KEY_PHONE_NUMBER, KEY_SERVICE_NO, KEY_USER_DATA, KEY_SENT_OTP] {
            entries.remove(key);
        }
    }
}
