//! Port interfaces for talking to the WxWork API
//!
//! The services in this crate describe *what* to call; an [`ApiDispatcher`]
//! implementation in the infrastructure layer owns the access token and the
//! HTTP exchange.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use wxwork_domain::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Performs authenticated calls against the API
///
/// Implementations attach a valid access token to every request, map
/// transport failures and non-2xx statuses to errors, and hand back the
/// decoded JSON body. They do not look at `errcode`; that is the caller's job
/// (see [`crate::envelope`]).
#[async_trait]
pub trait ApiDispatcher: Send + Sync {
    /// Send `body` as JSON (no body at all when `None`).
    ///
    /// `path` is relative to the API base, e.g. `/message/send`.
    async fn send_json(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value>;

    /// Send `file_bytes` as the single `media` part of a multipart form.
    async fn send_multipart(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        file_bytes: &[u8],
        file_name: &str,
    ) -> Result<Value>;

    /// Drop the cached access token so the next call refreshes it.
    async fn invalidate_token(&self);
}
