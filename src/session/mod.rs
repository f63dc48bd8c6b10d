//! Session Module
//!
//! Session storage contract for a host session subsystem, backed by a
//! CacheStore on its own collection.

mod handler;

use async_trait::async_trait;

use crate::error::Result;

pub use handler::DocumentSessionHandler;

// == Session Handler ==
/// Byte-string session persistence keyed by session id.
///
/// Payloads are the host's serialized session blob, kept as UTF-8 text.
#[async_trait]
pub trait SessionHandler: Send + Sync {
    /// Prepares the handler for a session save path and name.
    async fn open(&self, save_path: &str, name: &str) -> Result<bool>;

    /// Closes the handler.
    async fn close(&self) -> Result<bool>;

    /// Reads a session payload, `""` when unknown or expired.
    async fn read(&self, id: &str) -> Result<String>;

    /// Writes a session payload for the configured lifetime.
    async fn write(&self, id: &str, data: &str) -> Result<bool>;

    /// Deletes a session.
    async fn destroy(&self, id: &str) -> Result<bool>;

    /// Garbage-collects sessions older than `max_lifetime` seconds,
    /// returning how many were removed.
    async fn gc(&self, max_lifetime: u64) -> Result<u64>;
}
