//! Expiring Cache self-test
//!
//! Exercises the cache against the real clock: a default-configured round
//! trip, then a short-TTL run that waits for lazy and periodic expiry.

use std::time::Duration;

use anyhow::{ensure, Context};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expiring_cache::{Config, ExpiringCache};

/// TTL used by the timed part of the self-test
const SELF_TEST_TTL: Duration = Duration::from_secs(5);

/// Sweep interval used by the timed part of the self-test
const SELF_TEST_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Runs the self-test, stopping early on Ctrl+C or SIGTERM.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expiring_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: ttl={}s, sweep_interval={}s",
        config.ttl_secs, config.sweep_interval_secs
    );

    println!("CACHE SELF-TESTING:");
    tokio::select! {
        result = self_test(&config) => result?,
        _ = shutdown_signal() => {
            warn!("Self-test aborted");
            return Ok(());
        }
    }
    println!("SELF TESTING COMPLETED.");
    Ok(())
}

async fn self_test(config: &Config) -> anyhow::Result<()> {
    println!("=== 0 step: round trip through a cache built from configuration ===");
    let mut defaults: ExpiringCache<String, String> = ExpiringCache::from_config(config);
    defaults.set("test".to_string(), "string".to_string());
    let value = defaults.get("test").context("step 0: fresh value not found")?;
    ensure!(value == "string", "step 0: read back {value:?}");

    println!(
        "=== 1 step: creating new cache with TTL {} seconds ===",
        SELF_TEST_TTL.as_secs()
    );
    let mut cache: ExpiringCache<String, i32> =
        ExpiringCache::new(SELF_TEST_TTL, SELF_TEST_SWEEP_INTERVAL);

    println!("=== 2 step: storing first value and waiting 2 seconds ===");
    cache.set("one".to_string(), 1);
    cache.print(1);
    tokio::time::sleep(Duration::from_secs(2)).await;

    println!("=== 3 step: storing second value ===");
    cache.set("two".to_string(), 2);
    cache.print(1);
    tokio::time::sleep(Duration::from_secs(3)).await;

    println!("=== 4 step: first value has expired, check that the cache contains only value \"two\" ===");
    probe(&mut cache);
    cache.print(1);
    ensure!(cache.len() == 1, "TEST failed: cache size must be 1, got {}", cache.len());
    tokio::time::sleep(Duration::from_secs(3)).await;

    println!("=== 5 step: second value has expired, check that the cache is empty ===");
    probe(&mut cache);
    cache.print(1);
    ensure!(cache.is_empty(), "TEST failed: cache size must be 0, got {}", cache.len());

    let stats = serde_json::to_string(&cache.stats())?;
    info!(%stats, "self-test finished");
    Ok(())
}

/// Issues a lookup for a key that was never written, only to give the cache
/// a chance to sweep.
fn probe(cache: &mut ExpiringCache<String, i32>) {
    if let Err(err) = cache.get("probe") {
        info!("probe: {}", err);
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        }
    }
}
