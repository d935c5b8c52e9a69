//! Integration tests for the multiplexed storage endpoint.
//!
//! Uses axum-test to drive the router without binding a socket.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use vitrine::api::{
    ApiResponse, AppState, HealthResponse, ONLINE_STATUS, create_router, members,
};
use vitrine::config::ServerConfig;
use vitrine_core::primitives::AUDIT_LOG_CAPACITY;
use vitrine_core::{
    AuditLogEntry, Environment, KvStore, MemberPanel, StorageKey, default_config,
    default_features,
};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn test_config(api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        api_key: api_key.map(str::to_string),
        rate_limit: 0,
        ..ServerConfig::default()
    }
}

fn create_test_server() -> (TestServer, Arc<KvStore>) {
    create_server_with(test_config(None))
}

fn create_server_with(config: ServerConfig) -> (TestServer, Arc<KvStore>) {
    let store = Arc::new(KvStore::in_memory().expect("in-memory store"));
    let router = create_router(AppState::new(Arc::clone(&store)), &config);
    (TestServer::new(router).unwrap(), store)
}

async fn add_log(server: &TestServer, action: &str, details: &str) -> ApiResponse {
    server
        .post("/api")
        .add_query_param("action", "add_log")
        .json(&json!({ "action": action, "details": details, "severity": "info" }))
        .await
        .json()
}

// =============================================================================
// STATUS / HEALTH
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_missing_action_reports_online() {
    let (server, _) = create_test_server();

    let response = server.get("/api").await;
    response.assert_status_ok();
    let body: ApiResponse = response.json();
    assert!(body.success);
    assert_eq!(body.status.as_deref(), Some(ONLINE_STATUS));
}

#[tokio::test]
async fn test_unknown_action_reports_online() {
    let (server, _) = create_test_server();

    let body: ApiResponse = server
        .get("/api")
        .add_query_param("action", "drop_tables")
        .await
        .json();
    assert!(body.success);
    assert_eq!(body.status.as_deref(), Some(ONLINE_STATUS));
}

#[tokio::test]
async fn test_cors_allows_localhost_origin() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api")
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost:5173"))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("http://localhost:5173"))
    );
}

#[tokio::test]
async fn test_cors_ignores_unlisted_origin() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
        .await;
    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

// =============================================================================
// STORAGE
// =============================================================================

#[tokio::test]
async fn test_get_storage_missing_key_is_null() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api")
        .add_query_param("action", "get_storage")
        .add_query_param("key", "config")
        .await;
    response.assert_status_ok();

    let raw: Value = response.json();
    assert_eq!(raw, json!({ "success": true, "data": null }));
}

#[tokio::test]
async fn test_save_then_get_storage() {
    let (server, store) = create_test_server();
    let config = serde_json::to_value(default_config()).unwrap();

    let saved: ApiResponse = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .json(&json!({ "key": "config", "data": config }))
        .await
        .json();
    assert!(saved.success);

    let fetched: ApiResponse = server
        .get("/api")
        .add_query_param("action", "get_storage")
        .add_query_param("key", "config")
        .await
        .json();
    assert_eq!(fetched.data, Some(config.clone()));
    assert_eq!(store.get_document(StorageKey::Config).unwrap(), Some(config));
}

#[tokio::test]
async fn test_save_storage_replaces_whole_document() {
    let (server, store) = create_test_server();
    let mut features = serde_json::to_value(default_features()).unwrap();

    for enabled in [true, false] {
        features["salesToast"] = json!(enabled);
        server
            .post("/api")
            .add_query_param("action", "save_storage")
            .json(&json!({ "key": "features", "data": features }))
            .await
            .assert_status_ok();
    }

    let stored = store.get_document(StorageKey::Features).unwrap().unwrap();
    assert_eq!(stored["salesToast"], json!(false));
}

#[tokio::test]
async fn test_unknown_storage_key_is_rejected() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api")
        .add_query_param("action", "get_storage")
        .add_query_param("key", "secrets")
        .await;
    response.assert_status_bad_request();
    let body: ApiResponse = response.json();
    assert!(!body.success);

    let response = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .json(&json!({ "key": "secrets", "data": {} }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_save_storage_rejects_malformed_document() {
    let (server, store) = create_test_server();

    let response = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .json(&json!({ "key": "config", "data": { "pricingMode": "LayoutNOPE" } }))
        .await;
    response.assert_status_bad_request();
    assert_eq!(store.get_document(StorageKey::Config).unwrap(), None);
}

#[tokio::test]
async fn test_save_storage_accepts_partial_document() {
    let (server, store) = create_test_server();

    server
        .post("/api")
        .add_query_param("action", "save_storage")
        .json(&json!({ "key": "features", "data": { "salesToast": false } }))
        .await
        .assert_status_ok();

    assert_eq!(
        store.get_document(StorageKey::Features).unwrap(),
        Some(json!({ "salesToast": false }))
    );
}

#[tokio::test]
async fn test_save_storage_rejects_null_data() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .json(&json!({ "key": "config" }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_save_storage_requires_post() {
    let (server, _) = create_test_server();

    let response = server
        .get("/api")
        .add_query_param("action", "save_storage")
        .await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_invalid_json_body_is_rejected() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .text("{not json")
        .await;
    response.assert_status_bad_request();
}

// =============================================================================
// AUDIT LOG
// =============================================================================

#[tokio::test]
async fn test_add_log_fills_missing_fields() {
    let (server, _) = create_test_server();

    let body = add_log(&server, "FEATURE_TOGGLE", "Toggled salesToast").await;
    assert!(body.success);

    let logs: ApiResponse = server
        .get("/api")
        .add_query_param("action", "get_logs")
        .await
        .json();
    let entries: Vec<AuditLogEntry> = serde_json::from_value(logs.data.unwrap()).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].id.is_empty());
    assert!(entries[0].timestamp > 0);
    assert_eq!(entries[0].user, "ADMIN");
    assert_eq!(entries[0].environment, Environment::Prod);
}

#[tokio::test]
async fn test_add_log_uses_stored_environment() {
    let (server, store) = create_test_server();
    let mut config = default_config();
    config.environment = Environment::Staging;
    store
        .put_document(StorageKey::Config, &serde_json::to_value(config).unwrap())
        .unwrap();

    add_log(&server, "CONFIG_CHANGE", "Changed version to 2.0.0").await;

    let entries = store.recent_audit(10).unwrap();
    assert_eq!(entries[0].environment, Environment::Staging);
}

#[tokio::test]
async fn test_add_log_rejects_empty_action() {
    let (server, _) = create_test_server();

    let response = server
        .post("/api")
        .add_query_param("action", "add_log")
        .json(&json!({ "action": "  " }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_logs_is_newest_first_and_capped() {
    let (server, _) = create_test_server();

    for i in 0..(AUDIT_LOG_CAPACITY + 5) {
        add_log(&server, "CONTENT_UPDATE", &format!("entry {i}")).await;
    }

    let logs: ApiResponse = server
        .get("/api")
        .add_query_param("action", "get_logs")
        .await
        .json();
    let entries: Vec<AuditLogEntry> = serde_json::from_value(logs.data.unwrap()).unwrap();
    assert_eq!(entries.len(), AUDIT_LOG_CAPACITY);
    assert_eq!(entries[0].details, format!("entry {}", AUDIT_LOG_CAPACITY + 4));
    assert_eq!(entries[AUDIT_LOG_CAPACITY - 1].details, "entry 5");
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

#[tokio::test]
async fn test_mutations_require_api_key() {
    let (server, store) = create_server_with(test_config(Some("s3cret")));
    let config = serde_json::to_value(default_config()).unwrap();

    let response = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .json(&json!({ "key": "config", "data": config }))
        .await;
    response.assert_status_unauthorized();

    let response = server
        .post("/api")
        .add_query_param("action", "add_log")
        .authorization_bearer("wrong")
        .json(&json!({ "action": "CONFIG_CHANGE" }))
        .await;
    response.assert_status_unauthorized();
    assert_eq!(store.audit_len().unwrap(), 0);

    let response = server
        .post("/api")
        .add_query_param("action", "save_storage")
        .authorization_bearer("s3cret")
        .json(&json!({ "key": "config", "data": config }))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_reads_stay_public_with_api_key() {
    let (server, _) = create_server_with(test_config(Some("s3cret")));

    server
        .get("/api")
        .add_query_param("action", "get_storage")
        .add_query_param("key", "content")
        .await
        .assert_status_ok();
    server
        .get("/api")
        .add_query_param("action", "get_logs")
        .await
        .assert_status_ok();
    server.get("/health").await.assert_status_ok();
}

// =============================================================================
// LOGIN
// =============================================================================

#[tokio::test]
async fn test_login_success_returns_panel() {
    let (server, store) = create_test_server();
    members::provision_member(&store, "member@example.com", "hunter22", "VIP", 12.5).unwrap();

    let response = server
        .post("/api")
        .add_query_param("action", "login")
        .json(&json!({ "email": "member@example.com", "pass": "hunter22" }))
        .await;
    response.assert_status_ok();

    let body: ApiResponse = response.json();
    assert!(body.success);
    let panel: MemberPanel = serde_json::from_value(body.data.unwrap()).unwrap();
    assert_eq!(panel.user.email, "member@example.com");
    assert_eq!(panel.user.plan, "VIP");
    assert!(!panel.tools.is_empty());
}

#[tokio::test]
async fn test_login_failure_is_reported_in_body() {
    let (server, store) = create_test_server();
    members::provision_member(&store, "member@example.com", "hunter22", "VIP", 0.0).unwrap();

    for (email, pass) in [
        ("member@example.com", "wrong"),
        ("nobody@example.com", "hunter22"),
    ] {
        let response = server
            .post("/api")
            .add_query_param("action", "login")
            .json(&json!({ "email": email, "pass": pass }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some(members::INVALID_CREDENTIALS));
    }
}
