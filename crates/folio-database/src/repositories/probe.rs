//! Connectivity and size probe for PostgreSQL.

use async_trait::async_trait;
use sqlx::PgPool;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;

use crate::store::DatabaseProbe;

/// Runs `SELECT 1` and `pg_database_size` against the pool.
#[derive(Debug, Clone)]
pub struct PgDatabaseProbe {
    pool: PgPool,
}

impl PgDatabaseProbe {
    /// Create a new probe.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseProbe for PgDatabaseProbe {
    async fn ping(&self) -> AppResult<()> {
        let one: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Database ping failed", e))?;
        if one == 1 {
            Ok(())
        } else {
            Err(AppError::persistence("Database ping returned an unexpected value"))
        }
    }

    async fn database_size(&self) -> AppResult<Option<String>> {
        sqlx::query_scalar::<_, Option<String>>(
            "SELECT pg_size_pretty(pg_database_size(current_database()))",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to read database size", e))
    }
}
