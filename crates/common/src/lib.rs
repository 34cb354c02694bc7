//! Shared building blocks for the wxwork crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `observability`: tracing subscriber setup
//! - `runtime`: async infrastructure (credential cache, clock)
//! - `test-utils`: deterministic clock for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Observability tier
// --------------------------------------------------------------------
#[cfg(feature = "observability")]
pub mod observability;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(all(feature = "runtime", any(feature = "test-utils", test)))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{CachedToken, CredentialCache, IssuedToken, TokenFetcher, TokenState};
#[cfg(feature = "observability")]
pub use observability::{init_tracing, TracingConfig};
#[cfg(feature = "runtime")]
pub use time::{Clock, SystemClock};
