//! Audit log repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::types::PageResponse;
use folio_entity::audit::{AuditEntry, AuditQuery, NewAuditEntry};

use super::contains_pattern;
use crate::store::AuditStore;

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &AuditQuery) {
    qb.push(" WHERE TRUE");
    if let Some(action) = query.action {
        qb.push(" AND action = ").push_bind(action.as_str());
    }
    if let Some(kind) = query.entity_kind {
        qb.push(" AND entity_kind = ").push_bind(kind.as_str());
    }
    if let Some(severity) = query.severity {
        qb.push(" AND severity = ").push_bind(severity.as_str());
    }
    if let Some(success) = query.success {
        qb.push(" AND success = ").push_bind(success);
    }
    if let Some(actor_id) = query.actor_id {
        qb.push(" AND actor_id = ").push_bind(actor_id);
    }
    if let Some(term) = query.search_term() {
        let pattern = contains_pattern(term);
        qb.push(" AND (description ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR entity_id ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR actor_label ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

#[async_trait]
impl AuditStore for AuditLogRepository {
    async fn insert(&self, entry: NewAuditEntry) -> AppResult<AuditEntry> {
        sqlx::query_as::<_, AuditEntry>(
            "INSERT INTO audit_logs (id, action, entity_kind, entity_id, actor_id, actor_label, \
             ip_address, user_agent, session_key, description, payload, changes, severity, \
             success, error_message, requested_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(entry.action.as_str())
        .bind(entry.entity_kind.as_str())
        .bind(&entry.entity_id)
        .bind(entry.actor_id)
        .bind(&entry.actor_label)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.session_key)
        .bind(&entry.description)
        .bind(Json(&entry.payload))
        .bind(Json(&entry.changes))
        .bind(entry.severity.as_str())
        .bind(entry.success)
        .bind(&entry.error_message)
        .bind(entry.requested_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Persistence, "Failed to create audit entry", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>> {
        sqlx::query_as::<_, AuditEntry>("SELECT * FROM audit_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to find audit entry", e)
            })
    }

    async fn search(&self, query: &AuditQuery) -> AppResult<PageResponse<AuditEntry>> {
        let page = query.page.normalized();

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM audit_logs");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to count audit entries", e)
            })?;

        let mut select_qb = QueryBuilder::<Postgres>::new("SELECT * FROM audit_logs");
        push_filters(&mut select_qb, query);
        select_qb
            .push(" ORDER BY ")
            .push(query.ordering.as_sql())
            .push(" LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let entries = select_qb
            .build_query_as::<AuditEntry>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to search audit log", e)
            })?;

        Ok(PageResponse::new(entries, page, total as u64))
    }

    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM audit_logs WHERE $1::timestamptz IS NULL OR created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Persistence, "Failed to count audit entries", e)
        })?;
        Ok(count as u64)
    }

    async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("UPDATE audit_logs SET actor_id = NULL WHERE actor_id = $1")
            .bind(actor_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Persistence, "Failed to detach audit actor", e)
            })?;
        Ok(result.rows_affected())
    }
}
