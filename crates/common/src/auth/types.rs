//! Access token types
//!
//! [`IssuedToken`] is what a token endpoint hands back; [`CachedToken`] is the
//! slot the credential cache keeps it in, with the lifetime turned into an
//! absolute deadline.

use std::fmt;
use std::time::{Duration, Instant};

/// Upper bound applied to issued lifetimes so the deadline never overflows
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Token freshly returned by a token endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime counted from the moment the response arrived
    pub expires_in: Duration,
}

impl IssuedToken {
    pub fn new(access_token: impl Into<String>, expires_in: Duration) -> Self {
        Self { access_token: access_token.into(), expires_in }
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("access_token", &format_args!("<{} bytes>", self.access_token.len()))
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Cached access token
///
/// An empty `access_token` means no token is held. Expiry is checked lazily;
/// nothing clears the slot when the deadline passes.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: Option<Instant>,
}

impl CachedToken {
    /// No token; never usable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Store `issued`, starting its lifetime at `now`.
    pub fn from_issued(issued: IssuedToken, now: Instant) -> Self {
        let lifetime = issued.expires_in.min(MAX_TOKEN_LIFETIME);
        Self { access_token: issued.access_token, expires_at: Some(now + lifetime) }
    }

    /// Usable iff non-empty and `now` is strictly before the deadline.
    pub fn is_usable(&self, now: Instant) -> bool {
        !self.access_token.is_empty() && self.expires_at.is_some_and(|deadline| now < deadline)
    }

    /// Whether a token string is held, expired or not.
    pub fn is_present(&self) -> bool {
        !self.access_token.is_empty()
    }

    /// Time left before the deadline, `None` when absent or already expired
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        if !self.is_usable(now) {
            return None;
        }
        self.expires_at.map(|deadline| deadline.duration_since(now))
    }
}

impl fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedToken")
            .field("access_token", &format_args!("<{} bytes>", self.access_token.len()))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Read-only snapshot of the cache, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenState {
    pub has_token: bool,
    pub usable: bool,
    pub remaining: Option<Duration>,
    /// Completed refresh attempts, successful or not
    pub refresh_count: u64,
}
