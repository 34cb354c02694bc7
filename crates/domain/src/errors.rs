//! Error types used throughout the client
//!
//! Every failure surfaces as a single [`WxWorkError`]. The display string of
//! each variant starts with the stage that failed (request construction,
//! network call, response parsing, remote rejection, token refresh) so a log
//! line is enough to tell where a call stopped.

use thiserror::Error;

use crate::constants::CODE_ACCESS_TOKEN_EXPIRED;

/// Coarse grouping of [`WxWorkError`] variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection failures, non-2xx statuses, timeouts
    Transport,
    /// Response body was not the expected JSON envelope
    Parse,
    /// Envelope decoded but `errcode` was non-zero
    Api,
    /// Envelope reported the access-token-expired sentinel
    TokenExpired,
    /// The token endpoint call failed while refreshing
    Refresh,
    /// Caller-side problems (bad input, bad configuration, request building)
    Client,
}

/// Main error type for the WxWork client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WxWorkError {
    #[error("create request error, {0}")]
    Request(String),

    #[error("get response error, {0}")]
    Network(String),

    #[error("wxwork request error, HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("get response error, request timed out")]
    Timeout,

    #[error("parse response error, {0}")]
    Parse(String),

    #[error("call wxwork app {api} api error, {code} {message}", code = CODE_ACCESS_TOKEN_EXPIRED)]
    TokenExpired { api: &'static str, message: String },

    #[error("call wxwork app {api} api error, {code} {message}")]
    Api { api: &'static str, code: i64, message: String },

    #[error("refresh access token error, {0}")]
    RefreshFailed(Box<WxWorkError>),

    #[error("invalid input, {0}")]
    InvalidInput(String),

    #[error("configuration error, {0}")]
    Config(String),
}

impl WxWorkError {
    /// Build the error for a non-zero envelope code returned by `api`.
    ///
    /// The token-expired sentinel maps to [`WxWorkError::TokenExpired`];
    /// everything else is a generic [`WxWorkError::Api`].
    pub fn from_api_code(api: &'static str, code: i64, message: impl Into<String>) -> Self {
        let message = message.into();
        if code == CODE_ACCESS_TOKEN_EXPIRED {
            Self::TokenExpired { api, message }
        } else {
            Self::Api { api, code, message }
        }
    }

    /// Wrap an error raised while refreshing the access token.
    pub fn refresh_failed(source: WxWorkError) -> Self {
        Self::RefreshFailed(Box::new(source))
    }

    /// Which stage of a call the error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) | Self::HttpStatus { .. } | Self::Timeout => ErrorCategory::Transport,
            Self::Parse(_) => ErrorCategory::Parse,
            Self::Api { .. } => ErrorCategory::Api,
            Self::TokenExpired { .. } => ErrorCategory::TokenExpired,
            Self::RefreshFailed(_) => ErrorCategory::Refresh,
            Self::Request(_) | Self::InvalidInput(_) | Self::Config(_) => ErrorCategory::Client,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn is_token_expired(&self) -> bool {
        matches!(self, Self::TokenExpired { .. })
    }

    /// Remote `errcode`, if the error came from a decoded envelope
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::TokenExpired { .. } => Some(CODE_ACCESS_TOKEN_EXPIRED),
            Self::RefreshFailed(inner) => inner.api_code(),
            _ => None,
        }
    }

    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Request(_) => "request",
            Self::Network(_) => "network",
            Self::HttpStatus { .. } => "http_status",
            Self::Timeout => "timeout",
            Self::Parse(_) => "parse",
            Self::TokenExpired { .. } => "token_expired",
            Self::Api { .. } => "api",
            Self::RefreshFailed(_) => "refresh_failed",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config",
        }
    }
}

/// Result type alias for WxWork operations
pub type Result<T> = std::result::Result<T, WxWorkError>;
