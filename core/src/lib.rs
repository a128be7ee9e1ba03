//! # Gatepass Core
//!
//! Core client-side authentication logic for the Gatepass app.
//! This crate contains the domain entities, the authentication state
//! machine, the OTP verification flow, storage interfaces, and the error
//! types shared by every screen that drives them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
