use std::sync::Arc;
use std::time::Instant;

/// Source of monotonic time
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

/// Real system clock, used in production
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Implement Clock for Arc<T> so one clock can be shared with a test
impl<T: Clock> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
