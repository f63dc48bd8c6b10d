//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `/cache/:key` - Single-key cache operations
//! - `/batch` - Batch reads and writes
//! - `/locks/:name` - Distributed locks
//! - `/sessions/:id` - Session storage
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
