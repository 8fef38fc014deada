//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use tracing::info;

use folio_cache::CacheManager;
use folio_core::config::AppConfig;
use folio_core::traits::storage::StorageProvider;
use folio_database::Stores;
use folio_service::{
    AuditService, CacheCheck, DatabaseCheck, HealthService, ResourceCheck, ResourceSampler,
    SettingsService, StatsService, StorageCheck, TelemetryService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Settings singletons and the cached public projection
    pub settings: SettingsService,
    /// Audit trail
    pub audit: AuditService,
    /// Health probe
    pub health: HealthService,
    /// Request telemetry
    pub telemetry: TelemetryService,
    /// Dashboard statistics
    pub stats: StatsService,
}

impl AppState {
    /// Wires the services over already-initialised infrastructure.
    ///
    /// The `system_resources` health check and the stats resource figures
    /// are enabled only when a sampler is given.
    pub fn new(
        config: AppConfig,
        stores: &Stores,
        cache: CacheManager,
        storage: Arc<dyn StorageProvider>,
        sampler: Option<Arc<dyn ResourceSampler>>,
    ) -> Self {
        let mut health = HealthService::new(stores.health.clone(), &config.health)
            .with_check(Arc::new(DatabaseCheck::new(stores.probe.clone())))
            .with_check(Arc::new(CacheCheck::new(
                cache.clone(),
                config.health.probe_key.clone(),
            )))
            .with_check(Arc::new(StorageCheck::new(
                storage,
                config.storage.probe_dir.clone(),
            )));
        if let Some(sampler) = &sampler {
            health = health.with_check(Arc::new(ResourceCheck::new(
                sampler.clone(),
                config.health.resource_threshold_percent,
            )));
        }
        info!(checks = ?health.check_names(), "Health checks registered");

        Self {
            settings: SettingsService::new(stores, cache),
            audit: AuditService::new(stores.audit.clone()),
            health,
            telemetry: TelemetryService::new(stores.requests.clone(), config.telemetry.clone()),
            stats: StatsService::new(
                stores.content.clone(),
                stores.audit.clone(),
                stores.requests.clone(),
                stores.probe.clone(),
                sampler,
            ),
            config: Arc::new(config),
        }
    }
}
