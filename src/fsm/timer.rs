//! Phase timers over a free-running millisecond counter.
//!
//! The rig clock is a `u32` millisecond counter that overflows roughly
//! every 49.7 days.  All arithmetic on [`Timestamp`] is wrapping, so a
//! timer armed just before the overflow still measures the right span
//! after it.

use core::fmt;
use core::time::Duration;

/// Milliseconds since boot, truncated to `u32` (wraps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp(u32);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Wraparound-safe span from `earlier` to `self`.
    pub const fn since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `self` advanced by `d`, wrapping like the hardware counter.
    pub fn add(self, d: Duration) -> Self {
        Self(self.0.wrapping_add(d.as_millis() as u32))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A fixed-deadline interval timer.
///
/// `reset` re-arms it, `is_done` is a pure predicate.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    deadline_ms: u32,
    last: Timestamp,
}

impl Timer {
    pub fn new(deadline: Duration) -> Self {
        Self {
            deadline_ms: deadline.as_millis().min(u32::MAX as u128) as u32,
            last: Timestamp::ZERO,
        }
    }

    pub fn from_secs(secs: u32) -> Self {
        Self::new(Duration::from_secs(secs as u64))
    }

    pub fn reset(&mut self, now: Timestamp) {
        self.last = now;
    }

    /// True once strictly more than the deadline has elapsed since the
    /// last reset.
    pub fn is_done(&self, now: Timestamp) -> bool {
        now.since(self.last) > self.deadline_ms
    }

    pub fn elapsed_secs(&self, now: Timestamp) -> u32 {
        now.since(self.last) / 1000
    }

    pub fn total_secs(&self) -> u32 {
        self.deadline_ms / 1000
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms as u64)
    }

    /// Elapsed/total pair for the status display, elapsed capped at total.
    pub fn progress(&self, now: Timestamp) -> TimerProgress {
        let total_secs = self.total_secs();
        TimerProgress {
            elapsed_secs: self.elapsed_secs(now).min(total_secs),
            total_secs,
        }
    }
}

/// Timer progress shown as `mm:ss/mm:ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerProgress {
    pub elapsed_secs: u32,
    pub total_secs: u32,
}

impl fmt::Display for TimerProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}/{:02}:{:02}",
            self.elapsed_secs / 60,
            self.elapsed_secs % 60,
            self.total_secs / 60,
            self.total_secs % 60
        )
    }
}
