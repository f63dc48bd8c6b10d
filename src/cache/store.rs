//! Cache Store Module
//!
//! Expiring key-value cache semantics over one document collection. Expiry is
//! evaluated client-side against the stored timestamp at read time; expired
//! documents stay in the collection until overwritten or deleted.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{decode, encode, CacheEntry, Clock, SystemClock};
use crate::config::StoreConfig;
use crate::document::{Document, DocumentStore, FieldValue, Fields};
use crate::error::{CacheError, Result};
use crate::lock::CacheLock;

/// Lifetime used by `forever`: five years stands in for "never expires".
pub const FOREVER_SECONDS: i64 = 5 * 365 * 24 * 60 * 60;

// == Cache Store ==
/// Document-backed cache.
///
/// Cloning is cheap and shares the underlying client; each clone carries its
/// own prefix.
#[derive(Clone)]
pub struct CacheStore {
    /// Document-store client
    client: Arc<dyn DocumentStore>,
    /// Time source for expirations
    clock: Arc<dyn Clock>,
    collection: String,
    key_attribute: String,
    value_attribute: String,
    expiration_attribute: String,
    prefix: String,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a CacheStore over `client` with the given layout.
    pub fn new(client: Arc<dyn DocumentStore>, config: StoreConfig) -> Self {
        Self {
            client,
            clock: Arc::new(SystemClock),
            collection: config.collection,
            key_attribute: config.key_attribute,
            value_attribute: config.value_attribute,
            expiration_attribute: config.expiration_attribute,
            prefix: config.prefix,
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Returns `None` when the document is missing, holds no value, or is
    /// expired.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let id = self.document_id(key);
        let document = self.client.get(&self.collection, &id).await?;
        let now = self.clock.now();

        Ok(document.and_then(|doc| self.live_value(&doc, now)))
    }

    /// Retrieves a value by key, falling back to `default` on a miss.
    pub async fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    // == Many ==
    /// Retrieves several keys with a single query.
    ///
    /// Every requested key appears exactly once in the result, mapped to
    /// `None` on a miss. All expiry checks use the same instant.
    pub async fn many<K: AsRef<str>>(&self, keys: &[K]) -> Result<HashMap<String, Option<Value>>> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let ids: Vec<String> = keys.iter().map(|k| self.document_id(k.as_ref())).collect();
        let documents = self
            .client
            .query_in(&self.collection, &self.key_attribute, &ids)
            .await?;
        let now = self.clock.now();

        let mut values: HashMap<String, Option<Value>> = keys
            .iter()
            .map(|k| (k.as_ref().to_string(), None))
            .collect();

        for doc in documents {
            let key = doc.id.strip_prefix(self.prefix.as_str()).unwrap_or(&doc.id);
            if let Some(slot) = values.get_mut(key) {
                *slot = self.live_value(&doc, now);
            }
        }

        debug!("Cache many: {} keys requested", values.len());
        Ok(values)
    }

    // == Put ==
    /// Stores a value for `seconds`. A non-positive lifetime stores an entry
    /// that is already expired.
    pub async fn put(&self, key: &str, value: &Value, seconds: i64) -> Result<bool> {
        let id = self.document_id(key);
        let expires_at = expiration_after(self.clock.now(), seconds);
        let fields = self.entry_fields(&id, value, expires_at)?;

        self.client.set(&self.collection, &id, fields).await?;
        debug!("Cache put: {} for {}s", id, seconds);
        Ok(true)
    }

    // == Put Many ==
    /// Stores several values in one batched write sharing one expiration.
    pub async fn put_many<K, I>(&self, values: I, seconds: i64) -> Result<bool>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let expires_at = expiration_after(self.clock.now(), seconds);
        let writes = values
            .into_iter()
            .map(|(key, value)| {
                let id = self.document_id(key.as_ref());
                let fields = self.entry_fields(&id, &value, expires_at)?;
                Ok((id, fields))
            })
            .collect::<Result<Vec<_>>>()?;

        if writes.is_empty() {
            return Ok(true);
        }

        let count = writes.len();
        self.client.commit_batch(&self.collection, writes).await?;
        debug!("Cache put_many: {} entries for {}s", count, seconds);
        Ok(true)
    }

    // == Add ==
    /// Stores a value only if the key holds no usable value.
    ///
    /// A key that was never written is claimed with the store's atomic
    /// create. A key whose document is expired or unreadable is overwritten
    /// after the read, so two callers can both win that case.
    pub async fn add(&self, key: &str, value: &Value, seconds: i64) -> Result<bool> {
        let id = self.document_id(key);
        let existing = self.client.get(&self.collection, &id).await?;
        let now = self.clock.now();
        let fields = self.entry_fields(&id, value, expiration_after(now, seconds))?;

        let added = match existing {
            None => self.client.create(&self.collection, &id, fields).await?,
            Some(doc) if self.live_value(&doc, now).is_some() => false,
            Some(_) => {
                self.client.set(&self.collection, &id, fields).await?;
                true
            }
        };

        debug!("Cache add: {} added={}", id, added);
        Ok(added)
    }

    // == Increment / Decrement ==
    /// Atomically adds `by` to the stored value.
    ///
    /// The document must already exist. Returns `None` when the result is
    /// not an integer, e.g. when the stored value is a float.
    pub async fn increment(&self, key: &str, by: i64) -> Result<Option<i64>> {
        let id = self.document_id(key);
        let result = self
            .client
            .increment(&self.collection, &id, &self.value_attribute, by)
            .await?;

        match result {
            FieldValue::Integer(n) => Ok(Some(n)),
            other => {
                debug!("Cache increment on {} produced non-integer {:?}", id, other);
                Ok(None)
            }
        }
    }

    /// Atomically subtracts `by` from the stored value.
    ///
    /// `i64::MIN` has no positive counterpart and is rejected.
    pub async fn decrement(&self, key: &str, by: i64) -> Result<Option<i64>> {
        let by = by.checked_neg().ok_or_else(|| {
            CacheError::InvalidRequest(format!("Cannot decrement by {}", by))
        })?;
        self.increment(key, by).await
    }

    // == Forever ==
    /// Stores a value with the `FOREVER_SECONDS` horizon.
    pub async fn forever(&self, key: &str, value: &Value) -> Result<bool> {
        self.put(key, value, FOREVER_SECONDS).await
    }

    // == Forget ==
    /// Removes an entry. Succeeds whether or not it existed.
    pub async fn forget(&self, key: &str) -> Result<bool> {
        let id = self.document_id(key);
        self.client.delete(&self.collection, &id).await?;
        debug!("Cache forget: {}", id);
        Ok(true)
    }

    // == Flush ==
    /// Removes every document in the collection, whatever its prefix.
    pub async fn flush(&self) -> Result<bool> {
        let removed = self.client.delete_all(&self.collection).await?;
        info!(
            "Cache flush: removed {} documents from collection '{}'",
            removed, self.collection
        );
        Ok(true)
    }

    // == Sweep Expired ==
    /// Deletes documents in the collection that are expired right now.
    ///
    /// Each candidate is re-read before deletion so an entry rewritten since
    /// the listing survives. Returns the number of documents removed.
    pub async fn sweep_expired(&self) -> Result<usize> {
        let documents = self.client.list(&self.collection).await?;
        let mut removed = 0;

        for doc in documents {
            if !self.is_expired(&doc) {
                continue;
            }
            match self.client.get(&self.collection, &doc.id).await? {
                Some(current) if self.is_expired(&current) => {
                    self.client.delete(&self.collection, &doc.id).await?;
                    removed += 1;
                }
                _ => {}
            }
        }

        Ok(removed)
    }

    // == Locks ==
    /// Creates a lock handle for `name` with a lease of `seconds`
    /// (0 selects the default lease). A fresh owner token is generated when
    /// `owner` is `None`.
    pub fn lock(&self, name: &str, seconds: u64, owner: Option<String>) -> CacheLock {
        CacheLock::new(self.clone(), name, seconds, owner)
    }

    /// Rebuilds a handle for a lock acquired elsewhere, identified by its owner token.
    pub fn restore_lock(&self, name: &str, owner: impl Into<String>) -> CacheLock {
        self.lock(name, 0, Some(owner.into()))
    }

    // == Accessors ==
    /// Returns the key prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sets the key prefix for all subsequent operations on this handle.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Returns the document-store client.
    pub fn client(&self) -> &Arc<dyn DocumentStore> {
        &self.client
    }

    // == Helpers ==
    fn document_id(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    fn entry_fields(&self, id: &str, value: &Value, expires_at: DateTime<Utc>) -> Result<Fields> {
        let mut fields = Fields::new();
        fields.insert(self.key_attribute.clone(), FieldValue::String(id.to_string()));
        fields.insert(self.value_attribute.clone(), encode(value)?);
        fields.insert(
            self.expiration_attribute.clone(),
            FieldValue::Timestamp(expires_at),
        );
        Ok(fields)
    }

    fn entry(&self, doc: &Document) -> CacheEntry {
        CacheEntry::from_document(doc, &self.value_attribute, &self.expiration_attribute)
    }

    fn is_expired(&self, doc: &Document) -> bool {
        self.entry(doc).is_expired(self.clock.now())
    }

    fn live_value(&self, doc: &Document, now: DateTime<Utc>) -> Option<Value> {
        let entry = self.entry(doc);
        let field = entry.live_value(now)?;
        let value = decode(field);
        if value.is_none() {
            warn!("Cache entry {} holds an undecodable value, treating as miss", doc.id);
        }
        value
    }
}

impl fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("collection", &self.collection)
            .field("key_attribute", &self.key_attribute)
            .field("value_attribute", &self.value_attribute)
            .field("expiration_attribute", &self.expiration_attribute)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Absolute expiration for a lifetime starting at `now`.
fn expiration_after(now: DateTime<Utc>, seconds: i64) -> DateTime<Utc> {
    if seconds <= 0 {
        return now;
    }
    Duration::try_seconds(seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
