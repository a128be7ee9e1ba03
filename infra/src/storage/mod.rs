//! Durable session storage.

mod file;

pub use file::FileSessionStore;
