//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value and the instant it was written.
///
/// Entries are never mutated; re-writing a key replaces the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write timestamp
    pub created_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with `now`.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
        }
    }

    // == Age ==
    /// Time elapsed since the entry was written, zero if `now` precedes it.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Is Expired ==
    /// Checks if the entry is stale at `now`.
    ///
    /// Boundary condition: the entry is expired once `now >= created_at + ttl`,
    /// so it is already gone at the exact instant its TTL elapses.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) >= ttl
    }

    // == Time To Live ==
    /// Returns the time left before the entry expires, zero once expired.
    pub fn ttl_remaining(&self, now: Instant, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age(now))
    }
}
