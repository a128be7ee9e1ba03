//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Gatepass client,
//! providing the concrete collaborators the core crate only knows as traits:
//!
//! - **API**: HTTP client for the remote authentication API over `reqwest`
//! - **Storage**: file-backed session store with localStorage-shaped keys
//!
//! The core crate owns the state machines; everything here is replaceable
//! I/O. Swapping [`HttpAuthApi`] for a mock or [`FileSessionStore`] for the
//! in-memory store changes nothing above this layer.

pub mod api;
pub mod storage;

mod error;

pub use api::{ApiConfig, HttpAuthApi};
pub use error::InfraError;
pub use storage::FileSessionStore;
