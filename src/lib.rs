//! Expiring Cache - An in-memory key-value cache with TTL expiration
//!
//! Entries expire lazily when read and periodically through a sweep that
//! piggybacks on reads once the sweep interval has elapsed.

pub mod cache;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;

pub use cache::{CacheEntry, CacheStats, ExpiringCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use display::{PrettyPrinter, Repr, Snapshot};
pub use error::{CacheError, NotFoundReason};
