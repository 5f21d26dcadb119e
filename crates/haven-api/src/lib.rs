//! Async HTTP transport for the haven home-security cloud API.
//!
//! This crate is deliberately thin: it knows how to build a TLS-configured
//! `reqwest::Client`, attach a session token, construct endpoint paths, and
//! hand raw [`ApiResponse`] bodies back to `haven-core`. All reconciliation
//! and validation logic lives in the core crate — errors from here propagate
//! through it unmodified.

pub mod client;
pub mod error;
pub mod transport;
pub mod urls;

pub use client::{ApiClient, ApiResponse};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
