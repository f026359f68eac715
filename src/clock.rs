//! Clock Module
//!
//! Time sources for the cache. Production code reads the monotonic system
//! clock; tests drive a `ManualClock` forward explicitly.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

// == Clock Trait ==
/// Source of "now" for expiry decisions.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

// == System Clock ==
/// Monotonic clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Clones share the same elapsed time, so a test can keep one handle while
/// the cache owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Fixed reference point
    origin: Instant,
    /// Elapsed time since `origin` in nanoseconds
    elapsed_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at its creation instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves time forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.elapsed_nanos
            .fetch_add(duration_to_nanos(step), Ordering::SeqCst);
    }

    /// Moves time to `elapsed` after the origin. Never moves backwards.
    pub fn set_elapsed(&self, elapsed: Duration) {
        self.elapsed_nanos
            .fetch_max(duration_to_nanos(elapsed), Ordering::SeqCst);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

fn duration_to_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}
