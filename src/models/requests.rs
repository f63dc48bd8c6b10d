//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 1500;

/// Checks a caller key, returning an error message if it is unusable.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}

/// Request body for storing one value (PUT /cache/:key, POST /cache/:key/add)
///
/// # Fields
/// - `value`: Any JSON value
/// - `ttl`: Lifetime in seconds; omitted means stored forever
#[derive(Debug, Clone, Deserialize)]
pub struct ValueRequest {
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<i64>,
}

/// Request body for increment/decrement
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRequest {
    /// Amount to apply, 1 when omitted
    #[serde(default = "default_step")]
    pub by: i64,
}

fn default_step() -> i64 {
    1
}

impl Default for CounterRequest {
    fn default() -> Self {
        Self { by: default_step() }
    }
}

/// Request body for a batch read (POST /batch/get)
#[derive(Debug, Clone, Deserialize)]
pub struct ManyRequest {
    pub keys: Vec<String>,
}

impl ManyRequest {
    /// Validates every key; returns the first error message.
    pub fn validate(&self) -> Option<String> {
        self.keys.iter().find_map(|key| validate_key(key))
    }
}

/// Request body for a batch write (PUT /batch)
#[derive(Debug, Clone, Deserialize)]
pub struct PutManyRequest {
    pub values: HashMap<String, Value>,
    pub ttl: i64,
}

impl PutManyRequest {
    /// Validates every key; returns the first error message.
    pub fn validate(&self) -> Option<String> {
        self.values.keys().find_map(|key| validate_key(key))
    }
}

/// Request body for acquiring a lock (POST /locks/:name)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LockRequest {
    /// Lease in seconds, 0 selects the default lease
    #[serde(default)]
    pub seconds: u64,
    /// Owner token to acquire with; generated when omitted
    #[serde(default)]
    pub owner: Option<String>,
}

/// Request body for releasing a lock (DELETE /locks/:name)
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRequest {
    pub owner: String,
}

/// Request body for writing a session (PUT /sessions/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct SessionWriteRequest {
    pub data: String,
}
