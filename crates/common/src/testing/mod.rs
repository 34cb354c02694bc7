//! Test helpers shared by the wxwork crates

pub mod clock;

pub use clock::MockClock;
