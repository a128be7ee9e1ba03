//! Session store trait defining the persistence contract for sessions.
//!
//! All mutation of durable storage is centralized behind this interface so
//! the rest of the system deals only with in-memory [`Session`] values. The
//! auth service depends on this trait, never on ambient global storage,
//! which keeps it substitutable with [`MemorySessionStore`] in tests.
//!
//! [`MemorySessionStore`]: super::MemorySessionStore

use crate::domain::entities::session::Session;

/// Contract for durable session storage
///
/// Reads and writes are synchronous, per-key, and assumed atomic; there is
/// no transactional guarantee across keys. A crash between two key writes
/// leaves partial state, which the restore path tolerates.
pub trait SessionStore: Send + Sync {
    /// Reads the persisted session
    ///
    /// Returns `None` when neither `phoneNumber` nor `serviceNo` is present.
    /// A `userData` value that fails to decode, or decodes to a dead
    /// sentinel, is treated as absent and erased from storage; the failure
    /// is logged, never propagated.
    fn restore(&self) -> Option<Session>;

    /// Writes each present field of the session
    ///
    /// Absent fields are left untouched; no format validation is performed.
    fn persist(&self, session: &Session);

    /// Erases every session key unconditionally
    fn clear(&self);
}
