//! Backend selection.

use std::sync::Arc;

use tracing::info;

use folio_core::config::{DatabaseBackend, DatabaseConfig};
use folio_core::result::AppResult;
use folio_entity::settings::{AboutContent, ContactSetting, SystemSetting};

use crate::connection::DatabasePool;
use crate::memory::{
    MemoryAuditStore, MemoryContentCounter, MemoryDatabaseProbe, MemoryHealthStore,
    MemoryRequestLogStore, MemorySingletonStore,
};
use crate::migration::run_migrations;
use crate::repositories::{
    AuditLogRepository, ContentCountRepository, HealthCheckRepository, PgDatabaseProbe,
    RequestLogRepository, SingletonRepository,
};
use crate::store::{
    AuditStore, ContentCounter, DatabaseProbe, HealthStore, RequestLogStore, SingletonStore,
};

/// Every store the services need, behind trait objects.
#[derive(Debug, Clone)]
pub struct Stores {
    pub audit: Arc<dyn AuditStore>,
    pub health: Arc<dyn HealthStore>,
    pub requests: Arc<dyn RequestLogStore>,
    pub system_settings: Arc<dyn SingletonStore<SystemSetting>>,
    pub contact_settings: Arc<dyn SingletonStore<ContactSetting>>,
    pub about_content: Arc<dyn SingletonStore<AboutContent>>,
    pub content: Arc<dyn ContentCounter>,
    pub probe: Arc<dyn DatabaseProbe>,
    /// Present for the PostgreSQL backend.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Build the stores for the configured backend.
    ///
    /// For PostgreSQL this connects the pool and, when
    /// `database.run_migrations` is set, applies pending migrations.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.backend {
            DatabaseBackend::Memory => {
                info!("Using in-memory stores");
                Ok(Self::in_memory())
            }
            DatabaseBackend::Postgres => {
                let db = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    run_migrations(db.pool()).await?;
                }
                Ok(Self::postgres(db))
            }
        }
    }

    /// Stores backed by an existing PostgreSQL pool.
    pub fn postgres(db: DatabasePool) -> Self {
        let pool = db.pool().clone();
        Self {
            audit: Arc::new(AuditLogRepository::new(pool.clone())),
            health: Arc::new(HealthCheckRepository::new(pool.clone())),
            requests: Arc::new(RequestLogRepository::new(pool.clone())),
            system_settings: Arc::new(SingletonRepository::<SystemSetting>::new(pool.clone())),
            contact_settings: Arc::new(SingletonRepository::<ContactSetting>::new(pool.clone())),
            about_content: Arc::new(SingletonRepository::<AboutContent>::new(pool.clone())),
            content: Arc::new(ContentCountRepository::new(pool.clone())),
            probe: Arc::new(PgDatabaseProbe::new(pool)),
            pool: Some(db),
        }
    }

    /// Fresh, empty in-process stores.
    pub fn in_memory() -> Self {
        Self {
            audit: Arc::new(MemoryAuditStore::new()),
            health: Arc::new(MemoryHealthStore::new()),
            requests: Arc::new(MemoryRequestLogStore::new()),
            system_settings: Arc::new(MemorySingletonStore::<SystemSetting>::new()),
            contact_settings: Arc::new(MemorySingletonStore::<ContactSetting>::new()),
            about_content: Arc::new(MemorySingletonStore::<AboutContent>::new()),
            content: Arc::new(MemoryContentCounter::new()),
            probe: Arc::new(MemoryDatabaseProbe::new()),
            pool: None,
        }
    }
}
