//! Integration tests for tenant config resolution against real stores.
//!
//! The HTTP remote talks to a local mock server; the cache lives in a
//! JSON file in a temporary directory.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::time::Duration;
use tenant_session_auth::{
    RemoteConfig, SessionError, TenantConfig,
    constants::storage_keys,
    mocks::RecordingDiagnostics,
    providers::{ExternalReset, KeyValueStore, TenantConfigRemote, TenantConfigSource, TenantIdStore},
    stores::{
        CachedTenantConfigSource, FileKeyValueStore, HttpTenantConfigRemote, PersistedStateReset,
        StoredTenantId,
    },
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn remote(server: &MockServer) -> HttpTenantConfigRemote {
    HttpTenantConfigRemote::new(&RemoteConfig {
        url_template: format!("{}/{{tenant}}/config.json", server.uri()),
        request_timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn acme_document() -> serde_json::Value {
    json!({
        "apiHost": "https://api.acme.x",
        "cognito": {
            "userPools": [{
                "appDomain": "acme.auth.example.com",
                "userPoolId": "eu-west-1_Pool1",
                "clients": { "workgridclient": { "clientId": "abc123" } }
            }]
        }
    })
}

// ============================================================================
// HTTP remote
// ============================================================================

#[tokio::test]
async fn test_remote_downloads_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(acme_document()))
        .expect(1)
        .mount(&server)
        .await;

    let config = remote(&server).download("acme").await.unwrap();

    assert_eq!(config.api_host, "https://api.acme.x");
    let cognito = config.cognito.unwrap();
    let pool = &cognito.user_pools[0];
    assert_eq!(pool.region(), "eu-west-1");
    assert_eq!(pool.clients["workgridclient"].client_id, "abc123");
}

#[tokio::test]
async fn test_remote_unknown_tenant_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = remote(&server).download("nobody").await;

    assert_eq!(result, Err(SessionError::ConfigRequestFailed { status: 404 }));
}

#[tokio::test]
async fn test_remote_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = remote(&server).download("acme").await;

    assert!(matches!(result, Err(SessionError::MalformedConfig(_))));
}

#[tokio::test]
async fn test_remote_unreachable_is_network_error() {
    let server = MockServer::start().await;
    let remote = remote(&server);
    drop(server);

    let result = remote.download("acme").await;

    assert!(matches!(result, Err(SessionError::Network(_))));
}

// ============================================================================
// Cached source over a file store
// ============================================================================

#[tokio::test]
async fn test_cached_source_downloads_once_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("storage.json");
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/acme/config.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(acme_document()))
        .expect(1)
        .mount(&server)
        .await;

    let diagnostics = RecordingDiagnostics::new();
    let source =
        CachedTenantConfigSource::new(FileKeyValueStore::new(&file), remote(&server), diagnostics.clone());
    let first = source.fetch_tenant_config("acme").await.unwrap();

    // A fresh source over the same file answers from the cache
    let reopened =
        CachedTenantConfigSource::new(FileKeyValueStore::new(&file), remote(&server), diagnostics.clone());
    let second = reopened.fetch_tenant_config("acme").await.unwrap();

    assert_eq!(first, second);
    assert!(diagnostics.exceptions().is_empty());
}

#[tokio::test]
async fn test_cached_source_reports_unreadable_cache() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::new(dir.path().join("storage.json"));
    store.set(storage_keys::CONFIG_CACHE, "[1, 2, 3]").await.unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(acme_document()))
        .mount(&server)
        .await;

    let diagnostics = RecordingDiagnostics::new();
    let source = CachedTenantConfigSource::new(store.clone(), remote(&server), diagnostics.clone());
    let config = source.fetch_tenant_config("acme").await.unwrap();

    assert_eq!(config.map(|c| c.api_host), Some("https://api.acme.x".to_string()));
    assert_eq!(diagnostics.exceptions().len(), 1);

    // The broken cache was replaced with a valid one
    let raw = store.get(storage_keys::CONFIG_CACHE).await.unwrap().unwrap();
    let cache: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert!(cache.contains_key("acme"));
}

#[tokio::test]
async fn test_cached_source_propagates_remote_failure() {
    let dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = CachedTenantConfigSource::new(
        FileKeyValueStore::new(dir.path().join("storage.json")),
        remote(&server),
        RecordingDiagnostics::new(),
    );

    let result = source.fetch_tenant_config("acme").await;
    assert_eq!(result, Err(SessionError::ConfigRequestFailed { status: 503 }));
}

// ============================================================================
// Tenant id and reset over a file store
// ============================================================================

#[tokio::test]
async fn test_tenant_id_and_reset_share_one_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileKeyValueStore::new(dir.path().join("storage.json"));
    let tenant_ids = StoredTenantId::new(store.clone());

    tenant_ids.confirm_tenant_id("acme").await.unwrap();
    store
        .set(storage_keys::CONFIG_CACHE, &json!({ "acme": TenantConfig::new("https://api.acme.x") }).to_string())
        .await
        .unwrap();
    store.set(storage_keys::CURRENT_SPACE, "space-7").await.unwrap();

    assert_eq!(tenant_ids.fetch_tenant_id().await.unwrap().as_deref(), Some("acme"));

    PersistedStateReset::new(store.clone()).reset().await.unwrap();

    assert_eq!(tenant_ids.fetch_tenant_id().await.unwrap(), None);
    assert_eq!(store.keys().await.unwrap(), vec![storage_keys::CURRENT_SPACE.to_string()]);
}
