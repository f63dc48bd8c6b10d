//! Document Session Handler

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::SessionHandler;
use crate::cache::CacheStore;
use crate::error::Result;

/// Stores each session as one cache entry living `lifetime_minutes`.
///
/// Expired sessions are reclaimed lazily: a read past expiry returns an
/// empty payload and the next write replaces the document.
#[derive(Debug, Clone)]
pub struct DocumentSessionHandler {
    store: CacheStore,
    lifetime_minutes: u64,
}

impl DocumentSessionHandler {
    pub fn new(store: CacheStore, lifetime_minutes: u64) -> Self {
        Self {
            store,
            lifetime_minutes,
        }
    }

    /// Session lifetime in seconds.
    pub fn lifetime_seconds(&self) -> i64 {
        i64::try_from(self.lifetime_minutes.saturating_mul(60)).unwrap_or(i64::MAX)
    }
}

#[async_trait]
impl SessionHandler for DocumentSessionHandler {
    async fn open(&self, _save_path: &str, _name: &str) -> Result<bool> {
        Ok(true)
    }

    async fn close(&self) -> Result<bool> {
        Ok(true)
    }

    async fn read(&self, id: &str) -> Result<String> {
        Ok(match self.store.get(id).await? {
            Some(Value::String(data)) => data,
            Some(other) => other.to_string(),
            None => String::new(),
        })
    }

    async fn write(&self, id: &str, data: &str) -> Result<bool> {
        self.store
            .put(id, &Value::String(data.to_string()), self.lifetime_seconds())
            .await
    }

    async fn destroy(&self, id: &str) -> Result<bool> {
        self.store.forget(id).await
    }

    async fn gc(&self, max_lifetime: u64) -> Result<u64> {
        debug!("Session gc({}) skipped, expiry is evaluated on read", max_lifetime);
        Ok(0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::config::StoreConfig;
    use crate::document::{DocumentStore, FieldValue, MemoryDocumentStore};
    use std::sync::Arc;

    fn setup(minutes: u64) -> (DocumentSessionHandler, Arc<MemoryDocumentStore>, Arc<ManualClock>) {
        let client = Arc::new(MemoryDocumentStore::new());
        let clock = Arc::new(ManualClock::default());
        let store = CacheStore::new(client.clone(), StoreConfig::new("sessions")).with_clock(clock.clone());
        (DocumentSessionHandler::new(store, minutes), client, clock)
    }

    #[tokio::test]
    async fn test_open_and_close() {
        let (handler, _, _) = setup(120);
        assert!(handler.open("/tmp", "SESSID").await.unwrap());
        assert!(handler.close().await.unwrap());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let (handler, client, _) = setup(120);
        let payload = r#"a:1:{s:4:"name";s:8:"John Doe";}"#;

        assert!(handler.write("abc123", payload).await.unwrap());
        assert_eq!(handler.read("abc123").await.unwrap(), payload);

        let doc = client.get("sessions", "abc123").await.unwrap().unwrap();
        assert!(matches!(doc.field("value"), Some(FieldValue::Bytes(_))));
    }

    #[tokio::test]
    async fn test_read_unknown_session_is_empty() {
        let (handler, _, _) = setup(120);
        assert_eq!(handler.read("missing").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_session_expires_after_lifetime() {
        let (handler, _, clock) = setup(2);

        handler.write("abc123", "data").await.unwrap();
        clock.advance(119);
        assert_eq!(handler.read("abc123").await.unwrap(), "data");
        clock.advance(1);
        assert_eq!(handler.read("abc123").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_destroy() {
        let (handler, client, _) = setup(120);

        handler.write("abc123", "data").await.unwrap();
        assert!(handler.destroy("abc123").await.unwrap());
        assert_eq!(handler.read("abc123").await.unwrap(), "");
        assert_eq!(client.len("sessions").await, 0);
    }

    #[tokio::test]
    async fn test_gc_is_noop() {
        let (handler, client, clock) = setup(1);

        handler.write("old", "data").await.unwrap();
        clock.advance(3600);

        assert_eq!(handler.gc(60).await.unwrap(), 0);
        assert_eq!(client.len("sessions").await, 1);
    }
}
