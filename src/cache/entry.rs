//! Cache Entry Module
//!
//! Read-side view of a cache document: its value slot and its expiration.

use chrono::{DateTime, Utc};

use crate::document::{Document, FieldValue};

// == Cache Entry ==
/// The cache-relevant attributes of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored value attribute, if present
    pub value: Option<FieldValue>,
    /// Expiration timestamp, None when absent or not a timestamp
    pub expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Extracts the entry from a document using the configured attribute names.
    pub fn from_document(document: &Document, value_attribute: &str, expiration_attribute: &str) -> Self {
        let expires_at = match document.field(expiration_attribute) {
            Some(FieldValue::Timestamp(at)) => Some(*at),
            _ => None,
        };

        Self {
            value: document.field(value_attribute).cloned(),
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry whose expiration equals `now` is expired.
    /// A missing or malformed expiration counts as expired, so a damaged
    /// document reads as a miss rather than a stale hit.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => true,
        }
    }

    // == Live Value ==
    /// Returns the value if the entry is usable at `now`.
    ///
    /// A null value is treated the same as a missing one.
    pub fn live_value(&self, now: DateTime<Utc>) -> Option<&FieldValue> {
        match &self.value {
            None | Some(FieldValue::Null) => None,
            Some(_) if self.is_expired(now) => None,
            Some(value) => Some(value),
        }
    }
}
