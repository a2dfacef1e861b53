//! Monotonic clock adapter.
//!
//! Yields the rig's free-running millisecond [`Timestamp`].  On the host
//! this is `std::time::Instant` truncated to `u32`, so it wraps after
//! ~49.7 days exactly like the controller's hardware counter.

use std::time::Instant;

use crate::fsm::Timestamp;

pub struct MonotonicClock {
    start: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Milliseconds since construction, wrapping.
    pub fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.start.elapsed().as_millis() as u32)
    }
}
