//! Health probing: concurrent sub-checks aggregated into one report.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use folio_cache::CacheManager;
use folio_cache::keys;
use folio_core::config::HealthConfig;
use folio_core::error::AppError;
use folio_core::result::AppResult;
use folio_core::traits::cache::CacheProvider;
use folio_core::traits::storage::StorageProvider;
use folio_core::types::{JsonMap, PageRequest, PageResponse};
use folio_database::store::{DatabaseProbe, HealthStore};
use folio_entity::health::{CheckKind, HealthCheckResult, NewHealthCheckResult};

use crate::resources::{HostInfo, ResourceSampler, round2};

/// Message stored on a failed aggregate result.
pub const FAILED_CHECKS_MESSAGE: &str = "One or more checks failed";

/// One named probe. `Err` marks the check as failed with the error
/// message as detail.
#[async_trait]
pub trait HealthCheck: Send + Sync + std::fmt::Debug + 'static {
    fn name(&self) -> &'static str;

    async fn run(&self) -> AppResult<CheckOutcome>;
}

/// Result of one sub-check. `detail` is a message or a structured reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub passed: bool,
    pub detail: Value,
}

impl CheckOutcome {
    pub fn pass(detail: impl Into<Value>) -> Self {
        Self {
            passed: true,
            detail: detail.into(),
        }
    }

    pub fn fail(detail: impl Into<Value>) -> Self {
        Self {
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Aggregated outcome of one probe run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// `true` only if every sub-check passed.
    pub overall: bool,
    pub checks: BTreeMap<String, CheckOutcome>,
    pub elapsed_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl HealthReport {
    /// `"healthy"` or `"unhealthy"`.
    pub fn status(&self) -> &'static str {
        if self.overall { "healthy" } else { "unhealthy" }
    }

    /// `{name: passed}`.
    pub fn passed_map(&self) -> BTreeMap<String, bool> {
        self.checks
            .iter()
            .map(|(name, o)| (name.clone(), o.passed))
            .collect()
    }

    /// `{name: detail}`.
    pub fn details_map(&self) -> BTreeMap<String, Value> {
        self.checks
            .iter()
            .map(|(name, o)| (name.clone(), o.detail.clone()))
            .collect()
    }

    fn metadata(&self) -> JsonMap {
        let mut map = JsonMap::new();
        map.insert("checks".to_string(), json!(self.passed_map()));
        map.insert("details".to_string(), json!(self.details_map()));
        map
    }
}

/// Runs every registered check and records the aggregate.
#[derive(Debug, Clone)]
pub struct HealthService {
    checks: Vec<Arc<dyn HealthCheck>>,
    store: Arc<dyn HealthStore>,
    timeout: Duration,
    host: HostInfo,
}

impl HealthService {
    /// Creates a health service with no checks registered.
    pub fn new(store: Arc<dyn HealthStore>, config: &HealthConfig) -> Self {
        Self {
            checks: Vec::new(),
            store,
            timeout: Duration::from_millis(config.check_timeout_ms),
            host: HostInfo::detect(),
        }
    }

    /// Registers a check.
    pub fn with_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Names of the registered checks, in registration order.
    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Runs all checks concurrently, each under the per-check timeout.
    ///
    /// Never fails: check errors and timeouts become failed outcomes, and a
    /// failure to persist the result is only logged.
    pub async fn check(&self) -> HealthReport {
        let started = Instant::now();
        let timestamp = Utc::now();

        let runs = self.checks.iter().map(|check| {
            let check = Arc::clone(check);
            let limit = self.timeout;
            async move {
                let outcome = match tokio::time::timeout(limit, check.run()).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => CheckOutcome::fail(e.message),
                    Err(_) => {
                        CheckOutcome::fail(format!("Timed out after {}ms", limit.as_millis()))
                    }
                };
                (check.name().to_string(), outcome)
            }
        });

        let checks: BTreeMap<String, CheckOutcome> = join_all(runs).await.into_iter().collect();
        let overall = checks.values().all(|o| o.passed);
        let report = HealthReport {
            overall,
            checks,
            elapsed_ms: round2(started.elapsed().as_secs_f64() * 1000.0),
            timestamp,
        };

        info!(overall, elapsed_ms = report.elapsed_ms, "Health check completed");
        if !overall {
            let failed: Vec<&str> = report
                .checks
                .iter()
                .filter(|(_, o)| !o.passed)
                .map(|(name, _)| name.as_str())
                .collect();
            warn!(failed = ?failed, "Health check failed");
        }

        self.persist(&report).await;
        report
    }

    async fn persist(&self, report: &HealthReport) {
        let result = NewHealthCheckResult {
            check_kind: CheckKind::Full,
            success: report.overall,
            response_time_ms: report.elapsed_ms,
            error_message: if report.overall {
                String::new()
            } else {
                FAILED_CHECKS_MESSAGE.to_string()
            },
            hostname: self.host.hostname.clone(),
            runtime_version: env!("CARGO_PKG_VERSION").to_string(),
            os_version: self.host.os_version.clone(),
            metadata: report.metadata(),
        };
        match tokio::time::timeout(self.timeout, self.store.insert(result)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => warn!(error = %e, "Failed to persist health check result"),
            Err(_) => warn!(
                timeout_ms = self.timeout.as_millis() as u64,
                "Timed out persisting health check result"
            ),
        }
    }

    /// Newest-first history of persisted results.
    pub async fn history(
        &self,
        kind: Option<CheckKind>,
        page: PageRequest,
    ) -> AppResult<PageResponse<HealthCheckResult>> {
        self.store.recent(kind, page).await
    }
}

/// Round-trip to the database.
#[derive(Debug, Clone)]
pub struct DatabaseCheck {
    probe: Arc<dyn DatabaseProbe>,
}

impl DatabaseCheck {
    pub fn new(probe: Arc<dyn DatabaseProbe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl HealthCheck for DatabaseCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn run(&self) -> AppResult<CheckOutcome> {
        self.probe.ping().await?;
        Ok(CheckOutcome::pass("Database connection OK"))
    }
}

/// Set, read back and delete a throwaway cache key.
#[derive(Debug, Clone)]
pub struct CacheCheck {
    cache: CacheManager,
    probe_key: String,
}

impl CacheCheck {
    pub fn new(cache: CacheManager, probe_key: impl Into<String>) -> Self {
        Self {
            cache,
            probe_key: probe_key.into(),
        }
    }
}

#[async_trait]
impl HealthCheck for CacheCheck {
    fn name(&self) -> &'static str {
        "cache"
    }

    async fn run(&self) -> AppResult<CheckOutcome> {
        let nonce = Uuid::new_v4();
        let key = keys::health_probe(&self.probe_key, nonce);
        let expected = nonce.to_string();

        self.cache
            .set(&key, &expected, Duration::from_secs(10))
            .await?;
        let read_back = self.cache.get(&key).await;
        let cleanup = self.cache.delete(&key).await;

        match read_back? {
            Some(value) if value == expected => {
                cleanup?;
                Ok(CheckOutcome::pass(format!(
                    "Cache ({}) OK",
                    self.cache.provider_name()
                )))
            }
            _ => Err(AppError::cache("Cache round-trip returned a different value")),
        }
    }
}

/// Write, check and delete a throwaway object in media storage.
#[derive(Debug, Clone)]
pub struct StorageCheck {
    storage: Arc<dyn StorageProvider>,
    probe_dir: String,
}

impl StorageCheck {
    pub fn new(storage: Arc<dyn StorageProvider>, probe_dir: impl Into<String>) -> Self {
        Self {
            storage,
            probe_dir: probe_dir.into(),
        }
    }
}

#[async_trait]
impl HealthCheck for StorageCheck {
    fn name(&self) -> &'static str {
        "storage"
    }

    async fn run(&self) -> AppResult<CheckOutcome> {
        let path = format!(
            "{}/probe-{}.txt",
            self.probe_dir.trim_end_matches('/'),
            Uuid::new_v4()
        );
        self.storage
            .write(&path, Bytes::from_static(b"health check"))
            .await?;
        let found = self.storage.exists(&path).await;
        let cleanup = self.storage.delete(&path).await;

        if !found? {
            return Err(AppError::storage("Probe object missing after write"));
        }
        cleanup?;
        Ok(CheckOutcome::pass(format!(
            "Storage ({}) OK",
            self.storage.provider_type()
        )))
    }
}

/// CPU, memory and disk utilisation under a threshold.
#[derive(Debug, Clone)]
pub struct ResourceCheck {
    sampler: Arc<dyn ResourceSampler>,
    threshold_percent: f64,
}

impl ResourceCheck {
    pub fn new(sampler: Arc<dyn ResourceSampler>, threshold_percent: f64) -> Self {
        Self {
            sampler,
            threshold_percent,
        }
    }
}

#[async_trait]
impl HealthCheck for ResourceCheck {
    fn name(&self) -> &'static str {
        "system_resources"
    }

    /// Passes while every utilisation figure stays below the threshold. The detail carries the readings either way.
    async fn run(&self) -> AppResult<CheckOutcome> {
        let sample = self.sampler.sample().await?;
        let over: Vec<&str> = [
            ("cpu", sample.cpu_percent),
            ("memory", sample.memory_percent),
            ("disk", sample.disk_percent),
        ]
        .into_iter()
        .filter(|(_, value)| *value >= self.threshold_percent)
        .map(|(label, _)| label)
        .collect();

        let detail = json!({
            "cpu_percent": sample.cpu_percent,
            "memory_percent": sample.memory_percent,
            "disk_percent": sample.disk_percent,
            "memory_available_gb": sample.memory_available_gb,
            "disk_free_gb": sample.disk_free_gb,
        });

        if over.is_empty() {
            Ok(CheckOutcome::pass(detail))
        } else {
            warn!(over = ?over, threshold = self.threshold_percent, "Resource usage above threshold");
            Ok(CheckOutcome::fail(detail))
        }
    }
}

/// `{name: passed}` read back from a persisted full result.
pub fn checks_from_metadata(metadata: &JsonMap) -> BTreeMap<String, bool> {
    metadata
        .get("checks")
        .and_then(Value::as_object)
        .map(|m| {
            m.iter()
                .filter_map(|(k, v)| v.as_bool().map(|b| (k.clone(), b)))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use folio_core::config::cache::CacheConfig;
    use folio_database::memory::{MemoryDatabaseProbe, MemoryHealthStore};
    use folio_entity::stats::ResourceSample;
    use folio_storage::LocalStorageProvider;

    #[derive(Debug)]
    struct FixedSampler(f64);

    #[async_trait]
    impl ResourceSampler for FixedSampler {
        async fn sample(&self) -> AppResult<ResourceSample> {
            Ok(ResourceSample {
                cpu_percent: self.0,
                memory_percent: 40.0,
                disk_percent: 50.0,
                memory_available_gb: 3.25,
                disk_free_gb: 120.5,
                boot_time: None,
            })
        }
    }

    /// Storage whose writes always fail.
    #[derive(Debug)]
    struct ReadOnlyStorage;

    #[async_trait]
    impl StorageProvider for ReadOnlyStorage {
        fn provider_type(&self) -> &str {
            "read-only"
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(false)
        }
        async fn read_bytes(&self, path: &str) -> AppResult<Bytes> {
            Err(AppError::not_found(path.to_string()))
        }
        async fn write(&self, _path: &str, _data: Bytes) -> AppResult<()> {
            Err(AppError::storage("Read-only file system"))
        }
        async fn delete(&self, _path: &str) -> AppResult<()> {
            Ok(())
        }
        async fn exists(&self, _path: &str) -> AppResult<bool> {
            Ok(false)
        }
    }

    #[derive(Debug)]
    struct SlowCheck;

    #[async_trait]
    impl HealthCheck for SlowCheck {
        fn name(&self) -> &'static str {
            "external_api"
        }
        async fn run(&self) -> AppResult<CheckOutcome> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(CheckOutcome::pass("late"))
        }
    }

    /// History store whose writes never complete.
    #[derive(Debug)]
    struct StalledHealthStore;

    #[async_trait]
    impl HealthStore for StalledHealthStore {
        async fn insert(&self, _result: NewHealthCheckResult) -> AppResult<HealthCheckResult> {
            std::future::pending().await
        }
        async fn recent(
            &self,
            _kind: Option<CheckKind>,
            page: PageRequest,
        ) -> AppResult<PageResponse<HealthCheckResult>> {
            Ok(PageResponse::new(Vec::new(), page, 0))
        }
    }

    struct Fixture {
        probe: Arc<MemoryDatabaseProbe>,
        service: HealthService,
        _dir: tempfile::TempDir,
    }

    async fn fixture(storage: Option<Arc<dyn StorageProvider>>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let storage = match storage {
            Some(s) => s,
            None => Arc::new(LocalStorageProvider::new(dir.path()).await.unwrap()),
        };
        let store = Arc::new(MemoryHealthStore::new());
        let probe = Arc::new(MemoryDatabaseProbe::new());
        let cache = CacheManager::new(&CacheConfig::default()).await.unwrap();
        let config = HealthConfig {
            check_timeout_ms: 200,
            ..HealthConfig::default()
        };
        let service = HealthService::new(store, &config)
            .with_check(Arc::new(DatabaseCheck::new(probe.clone())))
            .with_check(Arc::new(CacheCheck::new(cache, "health_check")))
            .with_check(Arc::new(StorageCheck::new(storage, ".health")))
            .with_check(Arc::new(ResourceCheck::new(
                Arc::new(FixedSampler(10.0)),
                90.0,
            )));
        Fixture {
            probe,
            service,
            _dir: dir,
        }
    }

    #[tokio::test]
    async fn test_all_checks_pass() {
        let f = fixture(None).await;
        let report = f.service.check().await;

        assert!(report.overall, "{report:?}");
        assert_eq!(report.status(), "healthy");
        assert_eq!(report.checks.len(), 4);

        let history = f.service.history(None, PageRequest::default()).await.unwrap();
        assert_eq!(history.items.len(), 1);
        let row = &history.items[0];
        assert_eq!(row.check_kind, CheckKind::Full);
        assert!(row.success);
        assert!(row.error_message.is_empty());
        assert_eq!(checks_from_metadata(&row.metadata).len(), 4);
    }

    #[tokio::test]
    async fn test_storage_failure_flips_only_storage() {
        let f = fixture(Some(Arc::new(ReadOnlyStorage))).await;
        let report = f.service.check().await;

        assert!(!report.overall);
        let passed = report.passed_map();
        assert!(!passed["storage"]);
        assert!(passed["database"]);
        assert!(passed["cache"]);
        assert!(passed["system_resources"]);
        assert_eq!(report.checks["storage"].detail, "Read-only file system");

        let history = f.service.history(None, PageRequest::default()).await.unwrap();
        assert_eq!(history.items[0].error_message, FAILED_CHECKS_MESSAGE);
    }

    #[tokio::test]
    async fn test_database_outage_reported() {
        let f = fixture(None).await;
        f.probe.set_available(false);
        let report = f.service.check().await;
        assert!(!report.overall);
        assert!(!report.passed_map()["database"]);
    }

    #[tokio::test]
    async fn test_resource_threshold() {
        let check = ResourceCheck::new(Arc::new(FixedSampler(95.0)), 90.0);
        let outcome = check.run().await.unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.detail["cpu_percent"], 95.0);

        let check = ResourceCheck::new(Arc::new(FixedSampler(90.0)), 90.0);
        assert!(!check.run().await.unwrap().passed);

        let check = ResourceCheck::new(Arc::new(FixedSampler(89.0)), 90.0);
        let outcome = check.run().await.unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.detail["memory_percent"], 40.0);
        assert_eq!(outcome.detail["disk_percent"], 50.0);
        assert_eq!(outcome.detail["memory_available_gb"], 3.25);
        assert_eq!(outcome.detail["disk_free_gb"], 120.5);
    }

    #[tokio::test]
    async fn test_stalled_history_store_does_not_block_report() {
        let config = HealthConfig {
            check_timeout_ms: 200,
            ..HealthConfig::default()
        };
        let service = HealthService::new(Arc::new(StalledHealthStore), &config).with_check(
            Arc::new(DatabaseCheck::new(Arc::new(MemoryDatabaseProbe::new()))),
        );

        let report = tokio::time::timeout(Duration::from_secs(3), service.check())
            .await
            .expect("check() must return while the history store hangs");
        assert!(report.overall);
        assert!(report.passed_map()["database"]);
    }

    #[tokio::test]
    async fn test_slow_check_times_out() {
        let f = fixture(None).await;
        let service = f.service.clone().with_check(Arc::new(SlowCheck));
        let report = service.check().await;

        assert!(!report.overall);
        let outcome = &report.checks["external_api"];
        assert!(!outcome.passed);
        assert!(outcome.detail.as_str().unwrap().contains("Timed out"));
        assert!(report.passed_map()["database"]);
    }
}
