//! File-backed session store.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use gp_core::domain::entities::session::{
    Session, KEY_PHONE_NUMBER, KEY_SENT_OTP, KEY_SERVICE_NO, KEY_USER_DATA,
};
use gp_core::repositories::session::SessionStore;

use crate::error::InfraError;

/// Session store over a single JSON file of string keys
///
/// The file holds one flat object of raw storage strings, the same shape
/// [`MemorySessionStore`] keeps in memory. Every mutation is one per-key
/// read-modify-write of the whole file, so a crash between two key writes
/// leaves exactly the partial state the restore path tolerates. I/O faults
/// are logged and absorbed; the store contract stays infallible.
///
/// [`MemorySessionStore`]: gp_core::repositories::session::MemorySessionStore
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    io: Mutex<()>,
}

impl FileSessionStore {
    /// Opens a store at the given file path, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InfraError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path,
            io: Mutex::new(()),
        })
    }

    fn load(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                tracing::warn!(
                    event = "session_file_unreadable",
                    path = %self.path.display(),
                    error = %err,
                    "Could not read session file; treating it as empty"
                );
                return HashMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(
                    event = "session_file_malformed",
                    path = %self.path.display(),
                    error = %err,
                    "Session file is not a JSON object of strings; treating it as empty"
                );
                HashMap::new()
            }
        }
    }

    fn save(&self, entries: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(entries) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::error!(
                    event = "session_file_encode_failed",
                    error = %err,
                    "Could not encode session entries"
                );
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            tracing::warn!(
                event = "session_file_write_failed",
                path = %self.path.display(),
                error = %err,
                "Could not write session file"
            );
        }
    }

    fn write_key(&self, key: &str, value: &str) {
        let _guard = self.lock();
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries);
    }

    fn erase_key(&self, key: &str) {
        let _guard = self.lock();
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        match self.io.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn restore(&self) -> Option<Session> {
        let entries = {
            let _guard = self.lock();
            self.load()
        };
        let (session, erase_user_data) = Session::from_storage(
            entries.get(KEY_PHONE_NUMBER).cloned(),
            entries.get(KEY_SERVICE_NO).cloned(),
            entries.get(KEY_USER_DATA).cloned(),
            entries.get(KEY_SENT_OTP).cloned(),
        );
        if erase_user_data {
            tracing::warn!(
                event = "corrupt_session_data",
                path = %self.path.display(),
                "Stored user data was unusable; erasing it"
            );
            self.erase_key(KEY_USER_DATA);
        }
        session
    }

    fn persist(&self, session: &Session) {
        if let Some(phone_number) = &session.phone_number {
            self.write_key(KEY_PHONE_NUMBER, phone_number);
        }
        if let Some(service_no) = &session.service_no {
            self.write_key(KEY_SERVICE_NO, service_no);
        }
        if let Some(user_data) = &session.user_data {
            self.write_key(KEY_USER_DATA, &Session::encode_user_data(user_data));
        }
        if let Some(sent_otp) = &session.sent_otp {
            self.write_key(KEY_SENT_OTP, sent_otp);
        }
    }

    fn clear(&self) {
        for key in [KEY_PHONE_NUMBER, KEY_SERVICE_NO, KEY_USER_DATA, KEY_SENT_OTP] {
            self.erase_key(key);
        }
    }
}
