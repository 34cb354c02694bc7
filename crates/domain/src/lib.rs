//! # WxWork Domain
//!
//! Plain data for the WxWork (WeCom) app API client.
//!
//! This crate contains:
//! - Client configuration and credentials
//! - The client-wide error type and Result alias
//! - Endpoint paths, envelope codes and other remote constants
//! - Request payloads and response envelopes
//!
//! ## Architecture
//! - No dependencies on other wxwork crates
//! - No I/O; everything here is data and serde mappings

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
