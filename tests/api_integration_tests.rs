//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use doccache::{api::create_router, AppState, Config, MemoryDocumentStore, StoreConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    let state = AppState::from_config(Arc::new(MemoryDocumentStore::new()), &Config::default());
    create_router(state)
}

fn app_with_prefix(client: Arc<MemoryDocumentStore>, prefix: &str) -> Router {
    let config = Config {
        cache: StoreConfig::new("cache").with_prefix(prefix),
        ..Config::default()
    };
    create_router(AppState::from_config(client, &config))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_put_and_get() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/cache/get_key",
        Some(json!({"value": {"name": "John Doe", "roles": ["admin"]}, "ttl": 3600})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, json) = send(&app, "GET", "/cache/get_key", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "get_key");
    assert_eq!(json["value"], json!({"name": "John Doe", "roles": ["admin"]}));
}

#[tokio::test]
async fn test_get_missing_key_returns_null() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/cache/not-exists", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["value"].is_null());
}

#[tokio::test]
async fn test_zero_ttl_is_expired_immediately() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/gone", Some(json!({"value": 1, "ttl": 0}))).await;

    let (_, json) = send(&app, "GET", "/cache/gone", None).await;
    assert!(json["value"].is_null());
}

#[tokio::test]
async fn test_put_without_ttl_is_forever() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/pinned", Some(json!({"value": "forever test value"}))).await;

    let (_, json) = send(&app, "GET", "/cache/pinned", None).await;
    assert_eq!(json["value"], "forever test value");
}

#[tokio::test]
async fn test_forget() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/to_delete", Some(json!({"value": 1, "ttl": 60}))).await;

    let (status, json) = send(&app, "DELETE", "/cache/to_delete", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, json) = send(&app, "GET", "/cache/to_delete", None).await;
    assert!(json["value"].is_null());

    // Forgetting a missing key still succeeds
    let (status, _) = send(&app, "DELETE", "/cache/to_delete", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_add_only_once() {
    let app = create_test_app();

    let (_, first) = send(
        &app,
        "POST",
        "/cache/new-key/add",
        Some(json!({"value": "first", "ttl": 3600})),
    )
    .await;
    let (_, second) = send(
        &app,
        "POST",
        "/cache/new-key/add",
        Some(json!({"value": "second", "ttl": 3600})),
    )
    .await;

    assert_eq!(first["success"], true);
    assert_eq!(second["success"], false);

    let (_, json) = send(&app, "GET", "/cache/new-key", None).await;
    assert_eq!(json["value"], "first");
}

#[tokio::test]
async fn test_increment_and_decrement() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/counter", Some(json!({"value": 10, "ttl": 3600}))).await;

    let (status, json) = send(&app, "POST", "/cache/counter/increment", Some(json!({"by": 50}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], 60);

    let (_, json) = send(&app, "POST", "/cache/counter/decrement", Some(json!({"by": 30}))).await;
    assert_eq!(json["value"], 30);

    let (_, json) = send(&app, "GET", "/cache/counter", None).await;
    assert_eq!(json["value"], 30);
}

#[tokio::test]
async fn test_batch_put_and_get() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        "PUT",
        "/batch",
        Some(json!({"values": {"a": 1, "b": 2}, "ttl": 3600})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (status, json) = send(&app, "POST", "/batch/get", Some(json!({"keys": ["a", "b", "c"]}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["values"], json!({"a": 1, "b": 2, "c": null}));
}

#[tokio::test]
async fn test_batch_get_rejects_empty_key() {
    let app = create_test_app();

    let (status, json) = send(&app, "POST", "/batch/get", Some(json!({"keys": ["a", ""]}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_flush() {
    let app = create_test_app();

    send(
        &app,
        "PUT",
        "/batch",
        Some(json!({"values": {"first": 1, "second": 2}, "ttl": 3600})),
    )
    .await;

    let (status, _) = send(&app, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, "POST", "/batch/get", Some(json!({"keys": ["first", "second"]}))).await;
    assert_eq!(json["values"], json!({"first": null, "second": null}));
}

#[tokio::test]
async fn test_prefix_isolation() {
    let client = Arc::new(MemoryDocumentStore::new());
    let left = app_with_prefix(client.clone(), "left_");
    let right = app_with_prefix(client, "right_");

    send(&left, "PUT", "/cache/shared", Some(json!({"value": "left", "ttl": 60}))).await;

    let (_, json) = send(&right, "GET", "/cache/shared", None).await;
    assert!(json["value"].is_null());

    send(&right, "PUT", "/cache/shared", Some(json!({"value": "right", "ttl": 60}))).await;
    let (_, json) = send(&left, "GET", "/cache/shared", None).await;
    assert_eq!(json["value"], "left");
}

// == Lock Endpoint Tests ==

#[tokio::test]
async fn test_lock_lifecycle() {
    let app = create_test_app();

    let (status, first) = send(&app, "POST", "/locks/jobs", Some(json!({"seconds": 120}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["acquired"], true);
    let owner = first["owner"].as_str().unwrap().to_string();

    let (_, second) = send(&app, "POST", "/locks/jobs", Some(json!({"seconds": 120}))).await;
    assert_eq!(second["acquired"], false);

    let (_, current) = send(&app, "GET", "/locks/jobs", None).await;
    assert_eq!(current["owner"], owner.as_str());

    let (_, wrong) = send(&app, "DELETE", "/locks/jobs", Some(json!({"owner": "intruder"}))).await;
    assert_eq!(wrong["released"], false);

    let (_, right) = send(&app, "DELETE", "/locks/jobs", Some(json!({"owner": owner}))).await;
    assert_eq!(right["released"], true);

    let (_, current) = send(&app, "GET", "/locks/jobs", None).await;
    assert!(current["owner"].is_null());
}

#[tokio::test]
async fn test_lock_with_caller_owner_and_force_release() {
    let app = create_test_app();

    let (_, acquired) = send(&app, "POST", "/locks/report", Some(json!({"owner": "worker-1"}))).await;
    assert_eq!(acquired["acquired"], true);
    assert_eq!(acquired["owner"], "worker-1");

    let (status, json) = send(&app, "DELETE", "/locks/report/force", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["released"], true);

    let (_, again) = send(&app, "POST", "/locks/report", None).await;
    assert_eq!(again["acquired"], true);
}

// == Session Endpoint Tests ==

#[tokio::test]
async fn test_session_lifecycle() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "PUT",
        "/sessions/abc123",
        Some(json!({"data": "a:1:{s:4:\"name\";s:8:\"John Doe\";}"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, "GET", "/sessions/abc123", None).await;
    assert_eq!(json["data"], "a:1:{s:4:\"name\";s:8:\"John Doe\";}");

    send(&app, "DELETE", "/sessions/abc123", None).await;
    let (_, json) = send(&app, "GET", "/sessions/abc123", None).await;
    assert_eq!(json["data"], "");
}

#[tokio::test]
async fn test_sessions_do_not_leak_into_cache() {
    let app = create_test_app();

    send(&app, "PUT", "/sessions/shared-id", Some(json!({"data": "session"}))).await;

    let (_, json) = send(&app, "GET", "/cache/shared-id", None).await;
    assert!(json["value"].is_null());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/cache/key")
                .header("content-type", "application/json")
                .body(Body::from("not valid json"))
                .unwrap(),
        )
        .await
        .unwrap();

    // Axum returns 400 for malformed JSON bodies
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_counter_bodies_are_rejected() {
    let app = create_test_app();

    send(&app, "PUT", "/cache/hits", Some(json!({"value": 10, "ttl": 3600}))).await;

    let (status, json) = send(&app, "POST", "/cache/hits/increment", Some(json!({"by": "five"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json.get("error").is_some());

    let (status, _) = send(&app, "POST", "/cache/hits/decrement", Some(json!({"by": 5.5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(&app, "GET", "/cache/hits", None).await;
    assert_eq!(json["value"], 10);

    // An empty body still applies the default step
    let (status, json) = send(&app, "POST", "/cache/hits/increment", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], 11);
}

#[tokio::test]
async fn test_malformed_lock_body_is_rejected() {
    let app = create_test_app();

    let (status, _) = send(
        &app,
        "POST",
        "/locks/jobs",
        Some(json!({"seconds": -10, "owner": "me"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = send(&app, "GET", "/locks/jobs", None).await;
    assert!(current["owner"].is_null());
}

#[tokio::test]
async fn test_lock_with_requested_owner_releases_with_it() {
    let app = create_test_app();

    let (status, acquired) = send(
        &app,
        "POST",
        "/locks/jobs",
        Some(json!({"seconds": 10, "owner": "me"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(acquired["owner"], "me");

    let (_, released) = send(&app, "DELETE", "/locks/jobs", Some(json!({"owner": "me"}))).await;
    assert_eq!(released["released"], true);
}

#[tokio::test]
async fn test_store_unavailable_is_service_unavailable() {
    let client = Arc::new(MemoryDocumentStore::new());
    let app = app_with_prefix(client.clone(), "");
    client.set_available(false);

    let (status, json) = send(&app, "GET", "/cache/anything", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("unavailable"));
}
