//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Not Found Reason ==
/// Why a lookup produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// The key was never written, or was already reaped
    Missing,
    /// The key was stale at lookup time and was removed by that lookup
    Expired,
}

// == Cache Error Enum ==
/// The single "not found" error kind, split by cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not present in the cache
    #[error("no data with key \"{0}\"")]
    Missing(String),

    /// Key was present but its TTL had elapsed
    #[error("data with key \"{0}\" has expired")]
    Expired(String),
}

impl CacheError {
    /// Returns the cause of the miss.
    pub fn reason(&self) -> NotFoundReason {
        match self {
            CacheError::Missing(_) => NotFoundReason::Missing,
            CacheError::Expired(_) => NotFoundReason::Expired,
        }
    }

    /// Returns the rendered key the lookup was made with.
    pub fn key(&self) -> &str {
        match self {
            CacheError::Missing(key) | CacheError::Expired(key) => key,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache lookups.
pub type Result<T> = std::result::Result<T, CacheError>;
