//! Error types for the document cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Failures reported by a document-store client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store unreachable or temporarily unavailable
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Document required by the operation does not exist
    #[error("Document not found: {0}")]
    NotFound(String),

    /// Request rejected by the store
    #[error("Request rejected: {0}")]
    Rejected(String),
}

/// Convenience Result type for document-store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Cache Error Enum ==
/// Unified error type for cache, lock and session operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Underlying document store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Value could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Lock could not be acquired before the deadline
    #[error("Lock timeout: {0}")]
    LockTimeout(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            CacheError::Store(StoreError::Rejected(_)) => StatusCode::BAD_GATEWAY,
            CacheError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::LockTimeout(_) => StatusCode::LOCKED,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
