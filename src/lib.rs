//! Doccache - Expiring cache and distributed locks over a document database
//!
//! Maps cache semantics (TTL, add-if-absent, batches, atomic counters) and an
//! ownership-aware lock onto documents in one collection.

pub mod api;
pub mod cache;
pub mod config;
pub mod document;
pub mod error;
pub mod lock;
pub mod models;
pub mod session;
pub mod tasks;

pub use api::AppState;
pub use cache::CacheStore;
pub use config::{Config, StoreConfig};
pub use document::{DocumentStore, MemoryDocumentStore};
pub use error::{CacheError, StoreError};
pub use lock::{CacheLock, Lock};
pub use session::{DocumentSessionHandler, SessionHandler};
pub use tasks::spawn_sweep_task;
