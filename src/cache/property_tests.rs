//! Property-Based Tests for Cache Module
//!
//! Uses proptest with a manual clock, so expiry properties run without sleeping.

use proptest::prelude::*;
use std::time::Duration;

use crate::cache::ExpiringCache;
use crate::clock::ManualClock;
use crate::error::{CacheError, NotFoundReason};

// == Test Configuration ==
const TEST_TTL_SECS: u64 = 5;
const TEST_SWEEP_SECS: u64 = 1;

type TestCache = ExpiringCache<String, String, ManualClock>;

fn test_cache() -> (TestCache, ManualClock) {
    let clock = ManualClock::new();
    let cache = ExpiringCache::with_clock(
        Duration::from_secs(TEST_TTL_SECS),
        Duration::from_secs(TEST_SWEEP_SECS),
        clock.clone(),
    );
    (cache, clock)
}

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}"
}

/// A step in a generated workload
#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    /// Advance the clock by this many milliseconds
    Wait { millis: u64 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        (0u64..3_000).prop_map(|millis| CacheOp::Wait { millis }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Storing a pair and reading it back immediately returns the stored value.
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let (mut cache, _) = test_cache();

        cache.set(key.clone(), value.clone());
        prop_assert_eq!(cache.get(key.as_str()).cloned(), Ok(value));
    }

    // A second write wins, and its age is measured from the second write.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy(),
        gap_ms in 0u64..(TEST_TTL_SECS * 1000),
    ) {
        let (mut cache, clock) = test_cache();

        cache.set(key.clone(), value1);
        clock.advance(Duration::from_millis(gap_ms));
        cache.set(key.clone(), value2.clone());

        // Just before the second write's deadline
        clock.advance(Duration::from_millis(TEST_TTL_SECS * 1000 - 1));
        prop_assert_eq!(cache.get(key.as_str()).cloned(), Ok(value2));
        prop_assert_eq!(cache.len(), 1);
    }

    // Without writes, no operation ever grows the cache.
    #[test]
    fn prop_len_monotonic_without_writes(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut cache, clock) = test_cache();
        let mut last_len = 0;

        for op in ops {
            let wrote = matches!(op, CacheOp::Set { .. });
            match op {
                CacheOp::Set { key, value } => cache.set(key, value),
                CacheOp::Get { key } => {
                    let _ = cache.get(key.as_str());
                }
                CacheOp::Wait { millis } => clock.advance(Duration::from_millis(millis)),
            }
            if !wrote {
                prop_assert!(cache.len() <= last_len, "len grew from {} to {}", last_len, cache.len());
            }
            last_len = cache.len();
        }
    }

    // A lookup reports Expired exactly when the key was written at least one
    // TTL ago, and Missing when it was never written.
    #[test]
    fn prop_missing_vs_expired(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let (mut cache, clock) = test_cache();
        let ttl = Duration::from_secs(TEST_TTL_SECS);
        let mut written: std::collections::HashMap<String, Duration> = Default::default();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    written.insert(key.clone(), clock.elapsed());
                    cache.set(key, value);
                }
                CacheOp::Get { key } => {
                    let now = clock.elapsed();
                    let result = cache.get(key.as_str()).map(|_| ());
                    match written.get(&key).copied() {
                        Some(at) if now - at < ttl => prop_assert!(result.is_ok()),
                        Some(_) => {
                            // Stale: reaped either by this lookup or an earlier sweep
                            let err = result.unwrap_err();
                            prop_assert!(matches!(err, CacheError::Expired(_) | CacheError::Missing(_)));
                            written.remove(&key);
                        }
                        None => prop_assert_eq!(result.map_err(|e| e.reason()), Err(NotFoundReason::Missing)),
                    }
                }
                CacheOp::Wait { millis } => clock.advance(Duration::from_millis(millis)),
            }
        }
    }

    // Once the sweep interval has passed, any single lookup clears every
    // stale entry, whichever key it targets.
    #[test]
    fn prop_sweep_bound(
        ages in prop::collection::vec(0u64..(2 * TEST_TTL_SECS * 1000), 1..30),
    ) {
        let (mut cache, clock) = test_cache();
        let horizon = 2 * TEST_TTL_SECS * 1000;

        // Write entries so that entry i has age ages[i] at the horizon
        let mut order: Vec<(usize, u64)> = ages.iter().copied().enumerate().collect();
        order.sort_by_key(|&(_, age)| std::cmp::Reverse(age));
        for (i, age) in &order {
            clock.set_elapsed(Duration::from_millis(horizon - age));
            cache.set(format!("k{i}"), String::new());
        }
        clock.set_elapsed(Duration::from_millis(horizon));

        let _ = cache.get("probe");

        let fresh = ages.iter().filter(|&&age| age < TEST_TTL_SECS * 1000).count();
        prop_assert_eq!(cache.len(), fresh);
    }
}
