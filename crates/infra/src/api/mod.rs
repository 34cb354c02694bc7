//! WxWork API access
//!
//! - [`TokenEndpoint`]: fetches access tokens with the corp credentials
//! - [`AuthenticatedDispatcher`]: attaches the cached token to each call and
//!   performs the HTTP exchange for the core services
//!
//! Tokens are cached by `wxwork_common::CredentialCache`; nothing here retries.

pub mod dispatcher;
pub mod token;

pub use dispatcher::AuthenticatedDispatcher;
pub use token::TokenEndpoint;
