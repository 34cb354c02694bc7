//! # WxWork Core
//!
//! API operations of the WxWork app client, independent of transport.
//!
//! This crate contains:
//! - The [`ApiDispatcher`] port that performs authenticated calls
//! - Envelope checking shared by every operation
//! - Message, group chat and media services
//!
//! ## Architecture Principles
//! - Only depends on `wxwork-domain`
//! - No HTTP code; the dispatcher is injected
//! - Every operation is testable with an in-memory dispatcher

pub mod envelope;
pub mod ports;
pub mod services;

pub use ports::{ApiDispatcher, HttpMethod};
pub use services::{GroupChatService, MediaService, MessageService};
