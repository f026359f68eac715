//! Cache Module
//!
//! Provides in-memory caching with lazy and periodic TTL expiration.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::ExpiringCache;
