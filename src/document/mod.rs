//! Document Store Module
//!
//! The client seam the cache is written against: typed attribute values,
//! document snapshots, and the capability set a document database must offer.

mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreResult;

pub use memory::MemoryDocumentStore;

// == Field Value ==
/// A store-native attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
}

/// Attribute name to value mapping of one document.
pub type Fields = BTreeMap<String, FieldValue>;

// == Document ==
/// Snapshot of a stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document identity within its collection
    pub id: String,
    /// Attribute map at read time
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Returns the named attribute, if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

// == Document Store ==
/// Capabilities consumed from a document-database client.
///
/// Every call is independently consistent with respect to the store's own
/// per-document model; no cross-call ordering is implied.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a single document.
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Returns documents whose `field` holds a string contained in `values`.
    async fn query_in(
        &self,
        collection: &str,
        field: &str,
        values: &[String],
    ) -> StoreResult<Vec<Document>>;

    /// Creates or overwrites a document's full attribute map.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Creates a document only if the id is free.
    ///
    /// Returns `false` without writing when a document already exists.
    async fn create(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<bool>;

    /// Atomically adds `delta` to a numeric attribute of an existing document
    /// and returns the post-transform value.
    async fn increment(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        delta: i64,
    ) -> StoreResult<FieldValue>;

    /// Deletes a document. Deleting a missing id succeeds.
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Creates or overwrites several documents, committed as one unit.
    async fn commit_batch(&self, collection: &str, writes: Vec<(String, Fields)>)
        -> StoreResult<()>;

    /// Enumerates every document in a collection.
    async fn list(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Deletes every document in a collection, returning how many were removed.
    async fn delete_all(&self, collection: &str) -> StoreResult<u64>;
}
