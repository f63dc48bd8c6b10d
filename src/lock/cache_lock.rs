//! Cache Lock
//!
//! `Lock` over a CacheStore: acquire is `add`, release is delete-if-owned.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::{generate_owner, Lock, DEFAULT_LEASE_SECONDS, DEFAULT_RETRY_INTERVAL};
use crate::cache::CacheStore;
use crate::error::Result;

/// Lock record stored as a cache entry keyed by the lock name.
#[derive(Debug, Clone)]
pub struct CacheLock {
    store: CacheStore,
    name: String,
    seconds: u64,
    owner: String,
    retry_interval: Duration,
}

impl CacheLock {
    /// Creates a handle. Nothing is written until `acquire`.
    pub fn new(store: CacheStore, name: impl Into<String>, seconds: u64, owner: Option<String>) -> Self {
        Self {
            store,
            name: name.into(),
            seconds,
            owner: owner.unwrap_or_else(generate_owner),
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }

    /// Sets the pause between attempts in `block`.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Lease written on acquisition, in seconds.
    pub fn lease_seconds(&self) -> u64 {
        if self.seconds > 0 {
            self.seconds
        } else {
            DEFAULT_LEASE_SECONDS
        }
    }

    /// Acquires the lock, runs `f`, then releases.
    ///
    /// Returns `None` without running `f` when the lock is held elsewhere.
    pub async fn run<F, Fut, T>(&self, f: F) -> Result<Option<T>>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = T> + Send,
        T: Send,
    {
        if !self.acquire().await? {
            return Ok(None);
        }

        let output = f().await;
        self.release().await?;
        Ok(Some(output))
    }
}

#[async_trait]
impl Lock for CacheLock {
    fn name(&self) -> &str {
        &self.name
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn retry_interval(&self) -> Duration {
        self.retry_interval
    }

    async fn acquire(&self) -> Result<bool> {
        let seconds = i64::try_from(self.lease_seconds()).unwrap_or(i64::MAX);
        let acquired = self
            .store
            .add(&self.name, &Value::String(self.owner.clone()), seconds)
            .await?;

        debug!("Lock {} acquire by {}: {}", self.name, self.owner, acquired);
        Ok(acquired)
    }

    async fn release(&self) -> Result<bool> {
        if self.is_owned_by_current_process().await? {
            return self.store.forget(&self.name).await;
        }

        debug!("Lock {} not owned by {}, release skipped", self.name, self.owner);
        Ok(false)
    }

    async fn force_release(&self) -> Result<()> {
        warn!("Force releasing lock {}", self.name);
        self.store.forget(&self.name).await?;
        Ok(())
    }

    async fn current_owner(&self) -> Result<Option<String>> {
        Ok(match self.store.get(&self.name).await? {
            Some(Value::String(owner)) => Some(owner),
            Some(other) => Some(other.to_string()),
            None => None,
        })
    }
}
