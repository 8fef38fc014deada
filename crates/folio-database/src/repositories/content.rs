//! Counts over collaborator-owned content tables.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_entity::stats::CountTarget;

use crate::store::ContentCounter;

/// Table, creation column and extra predicate for a count target.
fn source(target: CountTarget) -> (&'static str, &'static str, &'static str) {
    match target {
        CountTarget::Users => ("users", "date_joined", "TRUE"),
        CountTarget::Articles => ("articles", "created_at", "TRUE"),
        CountTarget::PublishedArticles => ("articles", "created_at", "is_published"),
        CountTarget::PortfolioItems => ("portfolio_items", "created_at", "TRUE"),
        CountTarget::PublishedPortfolioItems => ("portfolio_items", "created_at", "is_published"),
        CountTarget::ContactMessages => ("contact_messages", "created_at", "TRUE"),
        CountTarget::UnreadContactMessages => ("contact_messages", "created_at", "status = 'new'"),
        CountTarget::Files => ("files", "created_at", "TRUE"),
    }
}

/// Read-only counts over tables owned by the content collaborators.
///
/// A table that does not exist (collaborator not installed) counts as zero.
#[derive(Debug, Clone)]
pub struct ContentCountRepository {
    pool: PgPool,
}

impl ContentCountRepository {
    /// Create a new content count repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn table_exists(&self, table: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
            .bind(table)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to inspect schema", e))
    }
}

#[async_trait]
impl ContentCounter for ContentCountRepository {
    async fn count(&self, target: CountTarget, since: Option<DateTime<Utc>>) -> AppResult<u64> {
        let (table, created_col, predicate) = source(target);
        if !self.table_exists(table).await? {
            debug!(table, %target, "Content table missing, counting as zero");
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) FROM {table} WHERE {predicate} \
             AND ($1::timestamptz IS NULL OR {created_col} >= $1)"
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Persistence,
                    format!("Failed to count {target}"),
                    e,
                )
            })?;
        Ok(count as u64)
    }

    async fn total_file_size(&self) -> AppResult<u64> {
        if !self.table_exists("files").await? {
            return Ok(0);
        }
        let total: Option<i64> =
            sqlx::query_scalar("SELECT SUM(file_size)::BIGINT FROM files")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Persistence, "Failed to sum file sizes", e)
                })?;
        Ok(total.unwrap_or(0).max(0) as u64)
    }
}
