//! Expired Entry Sweep
//!
//! Optional background task that deletes expired cache documents. Reads never
//! depend on it; it only reclaims storage earlier than lazy expiration would.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheStore;

/// Spawns a background task that periodically deletes expired documents.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Store failures are logged and the next sweep proceeds.
///
/// # Arguments
/// * `cache` - Store whose collection is swept
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_sweep_task(cache.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task(cache: CacheStore, sweep_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(sweep_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting sweep task on collection '{}' every {} seconds",
            cache.collection(),
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match cache.sweep_expired().await {
                Ok(0) => debug!("Sweep: no expired documents found"),
                Ok(removed) => info!("Sweep: removed {} expired documents", removed),
                Err(e) => warn!("Sweep failed: {}", e),
            }
        }
    })
}
