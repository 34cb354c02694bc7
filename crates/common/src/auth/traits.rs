//! Token source abstraction
//!
//! The credential cache only knows how to ask for a new token. Anything that
//! can produce one (the real token endpoint, a stub in tests) implements
//! [`TokenFetcher`].

use std::sync::Arc;

use async_trait::async_trait;

use super::types::IssuedToken;

/// Fetches a brand-new access token
#[async_trait]
pub trait TokenFetcher: Send + Sync + 'static {
    /// Error surfaced to every caller waiting on a failed refresh, hence `Clone`
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    async fn fetch_token(&self) -> Result<IssuedToken, Self::Error>;
}

#[async_trait]
impl<T: TokenFetcher + ?Sized> TokenFetcher for Arc<T> {
    type Error = T::Error;

    async fn fetch_token(&self) -> Result<IssuedToken, Self::Error> {
        (**self).fetch_token().await
    }
}
