//! Access token caching
//!
//! - [`CredentialCache`]: owns the cached token, refreshes it on demand and
//!   lets one caller refresh at a time
//! - [`TokenFetcher`]: where fresh tokens come from

pub mod cache;
pub mod traits;
pub mod types;

pub use cache::CredentialCache;
pub use traits::TokenFetcher;
pub use types::{CachedToken, IssuedToken, TokenState, MAX_TOKEN_LIFETIME};
