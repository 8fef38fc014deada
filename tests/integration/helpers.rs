//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use folio_api::{AppState, build_app};
use folio_cache::CacheManager;
use folio_core::config::{AppConfig, DatabaseBackend};
use folio_core::traits::storage::StorageProvider;
use folio_database::Stores;
use folio_database::store::RequestLogStore;
use folio_database::memory::{MemoryContentCounter, MemoryDatabaseProbe};
use folio_entity::user::UserRole;
use folio_storage::LocalStorageProvider;

/// Identity forwarded by the gateway on a test request.
#[derive(Debug, Clone)]
pub struct TestActor {
    pub id: Uuid,
    pub label: String,
    pub role: UserRole,
}

impl TestActor {
    pub fn admin() -> Self {
        Self {
            id: Uuid::new_v4(),
            label: "admin@example.com".to_string(),
            role: UserRole::Admin,
        }
    }

    pub fn editor() -> Self {
        Self {
            id: Uuid::new_v4(),
            label: "editor@example.com".to_string(),
            role: UserRole::Editor,
        }
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Stores behind the router, for direct inspection
    pub stores: Stores,
    /// Content rows counted by the stats endpoint
    pub content: Arc<MemoryContentCounter>,
    /// Switchable database liveness
    pub probe: Arc<MemoryDatabaseProbe>,
    /// Root of the media storage
    pub media_root: std::path::PathBuf,
    _dir: TempDir,
}

impl TestApp {
    /// Create a new test application over fresh in-memory stores
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Create a test application after adjusting the default test config
    pub async fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        Self::build(adjust, None).await
    }

    /// Create a test application whose request telemetry goes to `requests`
    pub async fn with_request_log(
        adjust: impl FnOnce(&mut AppConfig),
        requests: Arc<dyn RequestLogStore>,
    ) -> Self {
        Self::build(adjust, Some(requests)).await
    }

    async fn build(
        adjust: impl FnOnce(&mut AppConfig),
        requests: Option<Arc<dyn RequestLogStore>>,
    ) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let media_root = dir.path().join("media");

        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config.health.sample_resources = false;
        config.storage.root_path = media_root.to_string_lossy().into_owned();
        adjust(&mut config);

        let content = Arc::new(MemoryContentCounter::new());
        let probe = Arc::new(MemoryDatabaseProbe::new());
        let mut stores = Stores {
            content: content.clone(),
            probe: probe.clone(),
            ..Stores::in_memory()
        };
        if let Some(requests) = requests {
            stores.requests = requests;
        }

        let cache = CacheManager::new(&config.cache)
            .await
            .expect("Failed to init cache");
        let storage: Arc<dyn StorageProvider> = Arc::new(
            LocalStorageProvider::new(&media_root)
                .await
                .expect("Failed to init storage"),
        );

        let state = AppState::new(config, &stores, cache, storage, None);

        Self {
            router: build_app(state),
            stores,
            content,
            probe,
            media_root,
            _dir: dir,
        }
    }

    /// Make the media root unwritable by replacing it with a plain file
    pub fn break_storage(&self) {
        std::fs::remove_dir_all(&self.media_root).expect("Failed to remove media root");
        std::fs::write(&self.media_root, b"not a directory").expect("Failed to block media root");
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<&TestActor>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/json")
            .header("user-agent", "folio-tests")
            .header("x-forwarded-for", "203.0.113.7");

        if let Some(actor) = actor {
            req = req
                .header("x-actor-id", actor.id.to_string())
                .header("x-actor-label", &actor.label)
                .header("x-actor-role", actor.role.as_str());
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        // Telemetry is written on a detached task; let it land before the
        // next request inspects the log.
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        TestResponse { status, body }
    }

    /// GET as the given actor
    pub async fn get(&self, path: &str, actor: Option<&TestActor>) -> TestResponse {
        self.request("GET", path, None, actor).await
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope
    pub fn data(&self) -> &Value {
        assert_eq!(self.body["success"], Value::Bool(true), "{:?}", self.body);
        &self.body["data"]
    }
}
