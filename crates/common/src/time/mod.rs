//! Time abstraction for testability
//!
//! Expiry checks read the current instant through [`Clock`] so tests can move
//! time forward without sleeping.

pub mod clock;

pub use clock::{Clock, SystemClock};
