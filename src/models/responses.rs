//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

/// Response body for a single read (GET /cache/:key)
///
/// A miss is reported as `value: null`, not as an error.
#[derive(Debug, Clone, Serialize)]
pub struct ValueResponse {
    pub key: String,
    pub value: Option<Value>,
}

impl ValueResponse {
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for writes (put, add, forget)
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    pub key: String,
    /// Whether the write took effect
    pub success: bool,
}

impl WriteResponse {
    pub fn new(key: impl Into<String>, success: bool) -> Self {
        Self {
            key: key.into(),
            success,
        }
    }
}

/// Response body for increment/decrement
#[derive(Debug, Clone, Serialize)]
pub struct CounterResponse {
    pub key: String,
    /// Resulting integer, null when the result is not an integer
    pub value: Option<i64>,
}

impl CounterResponse {
    pub fn new(key: impl Into<String>, value: Option<i64>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for batch reads (POST /batch/get)
#[derive(Debug, Clone, Serialize)]
pub struct ManyResponse {
    pub values: HashMap<String, Option<Value>>,
}

/// Response body for batch writes and flush
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response body for lock acquisition (POST /locks/:name)
#[derive(Debug, Clone, Serialize)]
pub struct LockResponse {
    pub name: String,
    /// Owner token the caller must present to release
    pub owner: String,
    pub acquired: bool,
}

/// Response body for lock release (DELETE /locks/:name)
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseResponse {
    pub name: String,
    pub released: bool,
}

/// Response body for lock owner lookup (GET /locks/:name)
#[derive(Debug, Clone, Serialize)]
pub struct OwnerResponse {
    pub name: String,
    /// Current owner token, null when unlocked
    pub owner: Option<String>,
}

/// Response body for session reads
#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub data: String,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
