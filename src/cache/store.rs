//! Cache Store Module
//!
//! Main cache engine combining ordered map storage with lazy and periodic
//! TTL expiration.

use std::borrow::Borrow;
use std::fmt::Display;
use std::hash::Hash;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::display::{PrettyPrinter, Repr, Snapshot};
use crate::error::{CacheError, Result};

// == Expiring Cache ==
/// Key-value cache whose entries expire `ttl` after they were written.
///
/// Staleness is enforced in two places, both driven by reads:
/// - lazily, when `get` finds its target entry stale;
/// - periodically, when a `get` arrives at least `sweep_interval` after the
///   previous sweep, in which case every stale entry is dropped first.
///
/// Writes never expire anything. A cache that is only written to keeps every
/// entry until the next read.
#[derive(Debug)]
pub struct ExpiringCache<K, V, C = SystemClock> {
    /// Entries in first-insertion order
    entries: IndexMap<K, CacheEntry<V>>,
    /// Age at which an entry is stale
    ttl: Duration,
    /// Minimum time between periodic sweeps
    sweep_interval: Duration,
    /// When the last periodic sweep ran
    last_swept: Instant,
    stats: CacheStats,
    clock: C,
}

impl<K, V> ExpiringCache<K, V, SystemClock>
where
    K: Hash + Eq,
{
    // == Constructor ==
    /// Creates a cache on the system clock.
    ///
    /// # Arguments
    /// * `ttl` - Age at which entries expire
    /// * `sweep_interval` - Minimum time between periodic sweeps
    pub fn new(ttl: Duration, sweep_interval: Duration) -> Self {
        Self::with_clock(ttl, sweep_interval, SystemClock)
    }

    /// Creates a cache on the system clock from a Config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ttl(), config.sweep_interval())
    }
}

impl<K, V> Default for ExpiringCache<K, V, SystemClock>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl<K, V, C> ExpiringCache<K, V, C>
where
    K: Hash + Eq,
    C: Clock,
{
    /// Creates a cache reading time from `clock`. The sweep timer starts now.
    pub fn with_clock(ttl: Duration, sweep_interval: Duration, clock: C) -> Self {
        let last_swept = clock.now();
        Self {
            entries: IndexMap::new(),
            ttl,
            sweep_interval,
            last_swept,
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// The entry's age restarts from now. A resident key keeps its position in
    /// the snapshot order.
    pub fn set(&mut self, key: K, value: V) {
        let now = self.clock.now();
        self.entries.insert(key, CacheEntry::new(value, now));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Runs a periodic sweep first if one is due. Fails with
    /// `CacheError::Missing` if the key is absent and with
    /// `CacheError::Expired` if it was present but stale, in which case the
    /// entry is removed.
    pub fn get<Q>(&mut self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        let now = self.clock.now();
        if self.sweep_due(now) {
            self.sweep(now);
        }

        let Some(index) = self.entries.get_index_of(key) else {
            self.stats.record_miss();
            return Err(CacheError::Missing(key.to_string()));
        };

        if self.entries[index].is_expired(now, self.ttl) {
            self.entries.shift_remove_index(index);
            self.stats.record_expired();
            self.stats.set_total_entries(self.entries.len());
            trace!(key = %key, "lazy expiry");
            return Err(CacheError::Expired(key.to_string()));
        }

        self.stats.record_hit();
        Ok(&self.entries[index].value)
    }

    // == Sweep ==
    fn sweep_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_swept) >= self.sweep_interval
    }

    /// Drops every stale entry and restarts the sweep timer.
    ///
    /// Returns the number of entries removed.
    fn sweep(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        let removed = before - self.entries.len();

        self.last_swept = self.last_swept.max(now);
        self.stats.record_sweep(removed);
        self.stats.set_total_entries(self.entries.len());

        debug!(
            removed,
            remaining = self.entries.len(),
            "periodic sweep"
        );
        removed
    }
}

impl<K, V, C> ExpiringCache<K, V, C> {
    // == Length ==
    /// Returns the number of resident entries, stale or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Snapshot ==
    /// Borrowed view of every resident entry in insertion order.
    ///
    /// Stale entries are included; taking a snapshot never expires anything.
    pub fn snapshot(&self) -> Snapshot<'_, K, V> {
        self.entries
            .iter()
            .map(|(key, entry)| (key, &entry.value))
            .collect()
    }
}

impl<K, V, C> ExpiringCache<K, V, C>
where
    K: Repr,
    V: Repr,
{
    // == Print ==
    /// Writes the snapshot to stdout, wrapped at `width` columns.
    pub fn print(&self, width: usize) {
        println!("{}", PrettyPrinter::new(width).render(&self.snapshot()));
    }
}
