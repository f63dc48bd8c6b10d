//! API Handlers
//!
//! HTTP request handlers for the cache, lock and session endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::de::DeserializeOwned;

use crate::cache::{CacheStore, FOREVER_SECONDS};
use crate::config::Config;
use crate::document::DocumentStore;
use crate::error::{CacheError, Result};
use crate::lock::Lock;
use crate::models::{
    validate_key, CounterRequest, CounterResponse, HealthResponse, LockRequest, LockResponse,
    ManyRequest, ManyResponse, OwnerResponse, PutManyRequest, ReleaseRequest, ReleaseResponse,
    SessionResponse, SessionWriteRequest, SuccessResponse, ValueRequest, ValueResponse,
    WriteResponse,
};
use crate::session::{DocumentSessionHandler, SessionHandler};

/// Application state shared across all handlers.
///
/// Both stores are cheap clones sharing one document-store client.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Cache over the cache collection
    pub cache: CacheStore,
    /// Session handler over the session collection
    pub sessions: DocumentSessionHandler,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: CacheStore, sessions: DocumentSessionHandler) -> Self {
        Self { cache, sessions }
    }

    /// Creates a new AppState from configuration over `client`.
    pub fn from_config(client: Arc<dyn DocumentStore>, config: &Config) -> Self {
        let cache = CacheStore::new(client.clone(), config.cache.clone());
        let sessions = DocumentSessionHandler::new(
            CacheStore::new(client, config.session_store()),
            config.session_lifetime,
        );
        Self::new(cache, sessions)
    }
}

fn check_key(key: &str) -> Result<()> {
    match validate_key(key) {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Parses an optional JSON body.
///
/// Only an empty body selects the defaults; anything else must parse.
fn optional_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T> {
    if body.is_empty() {
        return Ok(T::default());
    }
    Json::<T>::from_bytes(body)
        .map(|Json(req)| req)
        .map_err(|rejection| CacheError::InvalidRequest(rejection.body_text()))
}

/// Handler for GET /cache/:key
///
/// A miss answers 200 with a null value.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ValueResponse>> {
    let value = state.cache.get(&key).await?;
    Ok(Json(ValueResponse::new(key, value)))
}

/// Handler for PUT /cache/:key
///
/// Stores forever when no ttl is given.
pub async fn put_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<WriteResponse>> {
    check_key(&key)?;

    let success = match req.ttl {
        Some(ttl) => state.cache.put(&key, &req.value, ttl).await?,
        None => state.cache.forever(&key, &req.value).await?,
    };
    Ok(Json(WriteResponse::new(key, success)))
}

/// Handler for DELETE /cache/:key
pub async fn forget_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<WriteResponse>> {
    let success = state.cache.forget(&key).await?;
    Ok(Json(WriteResponse::new(key, success)))
}

/// Handler for POST /cache/:key/add
///
/// `success` is false when the key already holds a live value.
pub async fn add_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValueRequest>,
) -> Result<Json<WriteResponse>> {
    check_key(&key)?;

    let ttl = req.ttl.unwrap_or(FOREVER_SECONDS);
    let added = state.cache.add(&key, &req.value, ttl).await?;
    Ok(Json(WriteResponse::new(key, added)))
}

/// Handler for POST /cache/:key/increment
pub async fn increment_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<CounterResponse>> {
    let req: CounterRequest = optional_body(&body)?;
    let value = state.cache.increment(&key, req.by).await?;
    Ok(Json(CounterResponse::new(key, value)))
}

/// Handler for POST /cache/:key/decrement
pub async fn decrement_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<Json<CounterResponse>> {
    let req: CounterRequest = optional_body(&body)?;
    let value = state.cache.decrement(&key, req.by).await?;
    Ok(Json(CounterResponse::new(key, value)))
}

/// Handler for DELETE /cache
///
/// Empties the whole cache collection regardless of prefix.
pub async fn flush_handler(State(state): State<AppState>) -> Result<Json<SuccessResponse>> {
    let success = state.cache.flush().await?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /batch/get
pub async fn many_handler(
    State(state): State<AppState>,
    Json(req): Json<ManyRequest>,
) -> Result<Json<ManyResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let values = state.cache.many(req.keys.as_slice()).await?;
    Ok(Json(ManyResponse { values }))
}

/// Handler for PUT /batch
pub async fn put_many_handler(
    State(state): State<AppState>,
    Json(req): Json<PutManyRequest>,
) -> Result<Json<SuccessResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let success = state.cache.put_many(req.values, req.ttl).await?;
    Ok(Json(SuccessResponse { success }))
}

/// Handler for POST /locks/:name
///
/// The returned owner token is what a later release must present.
pub async fn acquire_lock_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<LockResponse>> {
    check_key(&name)?;

    let req: LockRequest = optional_body(&body)?;
    if req.owner.as_deref() == Some("") {
        return Err(CacheError::InvalidRequest(
            "Owner cannot be empty".to_string(),
        ));
    }

    let lock = state.cache.lock(&name, req.seconds, req.owner);
    let acquired = lock.acquire().await?;
    Ok(Json(LockResponse {
        owner: lock.owner().to_string(),
        name,
        acquired,
    }))
}

/// Handler for GET /locks/:name
pub async fn lock_owner_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<OwnerResponse>> {
    let owner = state.cache.lock(&name, 0, None).current_owner().await?;
    Ok(Json(OwnerResponse { name, owner }))
}

/// Handler for DELETE /locks/:name
///
/// Releases only when the presented owner token holds the lock.
pub async fn release_lock_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(req): Json<ReleaseRequest>,
) -> Result<Json<ReleaseResponse>> {
    let released = state.cache.restore_lock(&name, req.owner).release().await?;
    Ok(Json(ReleaseResponse { name, released }))
}

/// Handler for DELETE /locks/:name/force
pub async fn force_release_lock_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ReleaseResponse>> {
    state.cache.lock(&name, 0, None).force_release().await?;
    Ok(Json(ReleaseResponse {
        name,
        released: true,
    }))
}

/// Handler for GET /sessions/:id
pub async fn read_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>> {
    let data = state.sessions.read(&id).await?;
    Ok(Json(SessionResponse { id, data }))
}

/// Handler for PUT /sessions/:id
pub async fn write_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SessionWriteRequest>,
) -> Result<Json<WriteResponse>> {
    check_key(&id)?;

    let success = state.sessions.write(&id, &req.data).await?;
    Ok(Json(WriteResponse::new(id, success)))
}

/// Handler for DELETE /sessions/:id
pub async fn destroy_session_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WriteResponse>> {
    let success = state.sessions.destroy(&id).await?;
    Ok(Json(WriteResponse::new(id, success)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
