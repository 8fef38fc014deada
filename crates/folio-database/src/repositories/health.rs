//! Health check history repository.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::types::{PageRequest, PageResponse};
use folio_entity::health::{CheckKind, HealthCheckResult, NewHealthCheckResult};

use crate::store::HealthStore;

/// Repository for persisted health probe results.
#[derive(Debug, Clone)]
pub struct HealthCheckRepository {
    pool: PgPool,
}

impl HealthCheckRepository {
    /// Create a new health check repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthStore for HealthCheckRepository {
    async fn insert(&self, result: NewHealthCheckResult) -> AppResult<HealthCheckResult> {
        sqlx::query_as::<_, HealthCheckResult>(
            "INSERT INTO health_checks (id, check_kind, success, response_time_ms, error_message, \
             hostname, runtime_version, os_version, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(result.check_kind.as_str())
        .bind(result.success)
        .bind(result.response_time_ms)
        .bind(&result.error_message)
        .bind(&result.hostname)
        .bind(&result.runtime_version)
        .bind(&result.os_version)
        .bind(Json(&result.metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to store health check", e)
        })
    }

    async fn recent(
        &self,
        kind: Option<CheckKind>,
        page: PageRequest,
    ) -> AppResult<PageResponse<HealthCheckResult>> {
        let page = page.normalized();
        let kind = kind.map(|k| k.as_str());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM health_checks WHERE $1::text IS NULL OR check_kind = $1",
        )
        .bind(kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to count health checks", e)
        })?;

        let items = sqlx::query_as::<_, HealthCheckResult>(
            "SELECT * FROM health_checks WHERE $1::text IS NULL OR check_kind = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(kind)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to list health checks", e)
        })?;

        Ok(PageResponse::new(items, page, total as u64))
    }
}
