//! Configuration Module
//!
//! Handles loading the cache's expiration settings from environment variables.

use std::env;
use std::time::Duration;

/// Default TTL in seconds
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Default minimum time between periodic sweeps in seconds
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Cache expiration parameters.
///
/// Both values are fixed for the lifetime of a cache built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Age in seconds at which an entry is considered stale
    pub ttl_secs: u64,
    /// Minimum time in seconds between periodic sweeps
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Entry TTL in seconds (default: 3600)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep interval in seconds (default: 60)
    pub fn from_env() -> Self {
        Self {
            ttl_secs: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TTL_SECS),
            sweep_interval_secs: env::var("CACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    /// TTL as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep interval as a Duration.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}
