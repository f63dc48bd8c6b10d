//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    acquire_lock_handler, add_handler, decrement_handler, destroy_session_handler, flush_handler,
    force_release_lock_handler, forget_handler, get_handler, health_handler, increment_handler,
    lock_owner_handler, many_handler, put_handler, put_many_handler, read_session_handler,
    release_lock_handler, write_session_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET|PUT|DELETE /cache/:key` - Read, store, forget one key
/// - `POST /cache/:key/add` - Store only if absent
/// - `POST /cache/:key/increment`, `POST /cache/:key/decrement` - Atomic counters
/// - `DELETE /cache` - Flush the cache collection
/// - `PUT /batch`, `POST /batch/get` - Batch write and read
/// - `POST|GET|DELETE /locks/:name` - Acquire, inspect, release a lock
/// - `DELETE /locks/:name/force` - Release a lock regardless of owner
/// - `GET|PUT|DELETE /sessions/:id` - Session storage
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/health", get(health_handler))
        .route("/cache", delete(flush_handler))
        .route(
            "/cache/:key",
            get(get_handler).put(put_handler).delete(forget_handler),
        )
        .route("/cache/:key/add", post(add_handler))
        .route("/cache/:key/increment", post(increment_handler))
        .route("/cache/:key/decrement", post(decrement_handler))
        .route("/batch", put(put_many_handler))
        .route("/batch/get", post(many_handler))
        .route(
            "/locks/:name",
            post(acquire_lock_handler)
                .get(lock_owner_handler)
                .delete(release_lock_handler),
        )
        .route("/locks/:name/force", delete(force_release_lock_handler))
        .route(
            "/sessions/:id",
            get(read_session_handler)
                .put(write_session_handler)
                .delete(destroy_session_handler),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
