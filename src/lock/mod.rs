//! Lock Module
//!
//! Ownership-aware mutual exclusion built from cache entries. A lock is one
//! document whose value is the holder's owner token.
//!
//! Acquisition is not a consensus protocol: owner tokens are opaque and
//! compared for equality only, and an expired lease can be taken over by two
//! callers at once.

mod cache_lock;

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CacheError, Result};

pub use cache_lock::CacheLock;

/// Lease applied when a lock is requested with zero seconds (one day).
pub const DEFAULT_LEASE_SECONDS: u64 = 86_400;

/// Pause between attempts while blocking on a lock.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Generates a random owner token.
pub fn generate_owner() -> String {
    Uuid::new_v4().to_string()
}

// == Lock Trait ==
/// A named lock held by an owner token.
#[async_trait]
pub trait Lock: Send + Sync {
    /// Name of the lock.
    fn name(&self) -> &str;

    /// Owner token this handle acquires and releases with.
    fn owner(&self) -> &str;

    /// Pause between attempts in `block`.
    fn retry_interval(&self) -> Duration {
        DEFAULT_RETRY_INTERVAL
    }

    /// Tries once to take the lock. `false` means someone else holds it.
    async fn acquire(&self) -> Result<bool>;

    /// Releases the lock if this handle's owner token currently holds it.
    async fn release(&self) -> Result<bool>;

    /// Releases the lock whoever holds it.
    async fn force_release(&self) -> Result<()>;

    /// Owner token currently stored for the lock, if it is held.
    async fn current_owner(&self) -> Result<Option<String>>;

    /// Whether the stored owner token equals this handle's.
    async fn is_owned_by_current_process(&self) -> Result<bool> {
        self.is_owned_by(self.owner()).await
    }

    /// Whether the stored owner token equals `owner`.
    async fn is_owned_by(&self, owner: &str) -> Result<bool> {
        Ok(self.current_owner().await?.as_deref() == Some(owner))
    }

    /// Retries `acquire` until it succeeds or `timeout` elapses.
    async fn block(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;

        loop {
            if self.acquire().await? {
                return Ok(());
            }

            let interval = self.retry_interval();
            if Instant::now() + interval > deadline {
                return Err(CacheError::LockTimeout(self.name().to_string()));
            }

            debug!("Lock {} busy, retrying in {:?}", self.name(), interval);
            tokio::time::sleep(interval).await;
        }
    }
}
