//! Remote authentication API client.

mod client;
mod config;

pub use client::HttpAuthApi;
pub use config::ApiConfig;
