//! End-to-end tests: the remote provider and the core store against a real
//! endpoint listening on an ephemeral port.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;
use vitrine::api::{AppState, ONLINE_STATUS, create_router, members};
use vitrine::config::ServerConfig;
use vitrine::provider::{DataProvider, LocalProvider, ProviderError, Providers, RemoteProvider};
use vitrine::store::{CoreStore, StoreOptions};
use vitrine_core::{
    FeatureFlag, FeatureFlags, KvStore, Preferences, ProviderKind, StorageKey, default_features,
};

// =============================================================================
// HELPERS
// =============================================================================

/// Serve a fresh endpoint and return its URL together with its store.
async fn spawn_endpoint(api_key: Option<&str>) -> (String, Arc<KvStore>) {
    let store = Arc::new(KvStore::in_memory().unwrap());
    let config = ServerConfig {
        api_key: api_key.map(str::to_string),
        rate_limit: 0,
        ..ServerConfig::default()
    };
    let router = create_router(AppState::new(Arc::clone(&store)), &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}/api"), store)
}

fn client(url: &str, api_key: Option<&str>) -> RemoteProvider {
    RemoteProvider::new(url, api_key.map(str::to_string), Some(Duration::from_secs(5))).unwrap()
}

fn remote_store(remote: RemoteProvider) -> CoreStore {
    let kv = Arc::new(KvStore::in_memory().unwrap());
    let local = Arc::new(LocalProvider::new(Arc::clone(&kv)));
    CoreStore::new(StoreOptions {
        providers: Providers::new(local, Some(Arc::new(remote))),
        preferences: Preferences::new(kv),
        initial_provider: ProviderKind::Remote,
    })
    .unwrap()
}

// =============================================================================
// PROVIDER
// =============================================================================

#[tokio::test]
async fn test_health_reports_online() {
    let (url, _) = spawn_endpoint(None).await;
    let status = client(&url, None).health().await.unwrap();
    assert_eq!(status, ONLINE_STATUS);
}

#[tokio::test]
async fn test_empty_endpoint_reads_as_absent() {
    let (url, _) = spawn_endpoint(None).await;
    let remote = client(&url, None);

    assert_eq!(remote.get_config().await.unwrap(), None);
    assert_eq!(remote.get_features().await.unwrap(), None);
    assert!(remote.get_content().await.unwrap().is_none());
    assert!(remote.get_logs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_features_round_trip_through_endpoint() {
    let (url, server_store) = spawn_endpoint(None).await;
    let remote = client(&url, None);
    let features = default_features().toggled(FeatureFlag::ExitPopup);

    remote.save_features(&features).await.unwrap();

    assert_eq!(remote.get_features().await.unwrap(), Some(features));
    let stored: FeatureFlags = serde_json::from_value(
        server_store.get_document(StorageKey::Features).unwrap().unwrap(),
    )
    .unwrap();
    assert_eq!(stored, features);
}

#[tokio::test]
async fn test_partial_remote_document_is_completed() {
    let (url, server_store) = spawn_endpoint(None).await;
    server_store
        .put_document(StorageKey::Features, &serde_json::json!({ "exitPopup": false }))
        .unwrap();

    let features = client(&url, None).get_features().await.unwrap().unwrap();
    assert!(!features.get(FeatureFlag::ExitPopup));
    assert_eq!(
        features.get(FeatureFlag::GlobalNotes),
        default_features().get(FeatureFlag::GlobalNotes)
    );
}

#[tokio::test]
async fn test_wrong_api_key_cannot_write() {
    let (url, server_store) = spawn_endpoint(Some("s3cret")).await;

    let err = client(&url, Some("guess"))
        .save_features(&default_features())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::BackendUnavailable(_)));
    assert_eq!(server_store.get_document(StorageKey::Features).unwrap(), None);

    client(&url, Some("s3cret"))
        .save_features(&default_features())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_against_endpoint() {
    let (url, server_store) = spawn_endpoint(None).await;
    members::provision_member(&server_store, "member@example.com", "hunter22", "VIP", 0.0)
        .unwrap();
    let remote = client(&url, None);

    let panel = remote.login("member@example.com", "hunter22").await.unwrap();
    assert_eq!(panel.user.email, "member@example.com");

    let err = remote.login("member@example.com", "nope").await.unwrap_err();
    assert_eq!(err, ProviderError::Rejected(members::INVALID_CREDENTIALS.to_string()));
}

// =============================================================================
// STORE OVER HTTP
// =============================================================================

#[tokio::test]
async fn test_store_seeds_empty_endpoint_and_audits_changes() {
    let (url, server_store) = spawn_endpoint(None).await;
    let store = remote_store(client(&url, None));

    store.boot().await.unwrap();
    assert_eq!(store.active_provider().await, ProviderKind::Remote);
    for key in StorageKey::ALL {
        assert!(server_store.get_document(key).unwrap().is_some(), "{key} not seeded");
    }

    store.toggle_feature(FeatureFlag::FloatingChat).await.unwrap();

    let logs = server_store.recent_audit(10).unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].details, "Toggled floatingChat");
    assert_eq!(store.logs().await, logs);
}

#[tokio::test]
async fn test_store_falls_back_when_endpoint_is_down() {
    let remote = RemoteProvider::new(
        "http://127.0.0.1:9/api",
        None,
        Some(Duration::from_millis(500)),
    )
    .unwrap();
    let store = remote_store(remote);

    store.boot().await.unwrap();
    assert_eq!(store.active_provider().await, ProviderKind::Local);
    assert!(store.is_initialized().await);
}
