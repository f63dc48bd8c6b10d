//! In-Memory Document Store
//!
//! Process-local `DocumentStore` used by the server binary and the tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Document, DocumentStore, FieldValue, Fields};
use crate::error::{StoreError, StoreResult};

type Collection = BTreeMap<String, Fields>;

// == Memory Document Store ==
/// Collections of documents held in a `RwLock`.
///
/// Single-document operations (including `create` and `increment`) run under
/// the write lock, so they are atomic with respect to each other.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
    available: AtomicBool,
}

impl MemoryDocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Toggles availability. While unavailable every call fails with
    /// `StoreError::Unavailable`.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of documents physically stored in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |docs| docs.len())
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable(
                "memory store switched off".to_string(),
            ))
        }
    }
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        self.check_available()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(id, fields.clone())))
    }

    async fn query_in(
        &self,
        collection: &str,
        field: &str,
        values: &[String],
    ) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, fields)| match fields.get(field) {
                Some(FieldValue::String(s)) => values.contains(s),
                _ => false,
            })
            .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
            .collect())
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
        Ok(())
    }

    async fn create(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<bool> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(id) {
            return Ok(false);
        }
        docs.insert(id.to_string(), fields);
        Ok(true)
    }

    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<FieldValue> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let fields = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound(format!("{}/{}", collection, id)))?;

        // Non-numeric or missing fields are replaced by the delta itself.
        let next = match fields.get(field) {
            Some(FieldValue::Integer(n)) => FieldValue::Integer(n.saturating_add(delta)),
            Some(FieldValue::Double(d)) => FieldValue::Double(d + delta as f64),
            _ => FieldValue::Integer(delta),
        };
        fields.insert(field.to_string(), next.clone());
        Ok(next)
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    async fn commit_batch(
        &self,
        collection: &str,
        writes: Vec<(String, Fields)>,
    ) -> StoreResult<()> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        debug!("Committing batch of {} writes to {}", writes.len(), collection);
        docs.extend(writes);
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>> {
        self.check_available()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete_all(&self, collection: &str) -> StoreResult<u64> {
        self.check_available()?;
        let mut collections = self.collections.write().await;
        Ok(collections
            .remove(collection)
            .map_or(0, |docs| docs.len() as u64))
    }
}
