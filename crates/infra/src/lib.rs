//! # WxWork Infrastructure
//!
//! HTTP implementations of the core ports and the ready-to-use client.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpClient`]
//! - The token endpoint fetcher and the authenticated dispatcher
//! - Configuration loading from the environment or files
//! - [`WxWorkApp`], which wires everything together
//!
//! ## Architecture
//! - Implements traits defined in `wxwork-core` and `wxwork-common`
//! - Contains all I/O

pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{AuthenticatedDispatcher, TokenEndpoint};
pub use app::WxWorkApp;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
