//! API request log repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use folio_core::error::{AppError, ErrorKind};
use folio_core::result::AppResult;
use folio_core::types::PageResponse;
use folio_entity::request_log::{
    ApiRequestRecord, EndpointStat, NewApiRequestRecord, RequestLogQuery, StatusCount,
    WindowAggregate,
};

use super::contains_pattern;
use crate::store::RequestLogStore;

/// Repository for API request telemetry.
#[derive(Debug, Clone)]
pub struct RequestLogRepository {
    pool: PgPool,
}

impl RequestLogRepository {
    /// Create a new request log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, query: &RequestLogQuery) {
    qb.push(" WHERE TRUE");
    if let Some(method) = &query.method {
        qb.push(" AND method = ").push_bind(method.to_uppercase());
    }
    if let Some(status) = query.status_code {
        qb.push(" AND status_code = ").push_bind(status);
    }
    if let Some(auth) = query.is_authenticated {
        qb.push(" AND is_authenticated = ").push_bind(auth);
    }
    if let Some(term) = query.search_term() {
        let pattern = contains_pattern(term);
        qb.push(" AND (path ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR ip_address ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR actor_label ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

fn persistence(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Persistence, message, e)
}

#[async_trait]
impl RequestLogStore for RequestLogRepository {
    async fn insert(&self, record: NewApiRequestRecord) -> AppResult<ApiRequestRecord> {
        sqlx::query_as::<_, ApiRequestRecord>(
            "INSERT INTO api_request_logs (id, method, path, query_params, user_agent, ip_address, \
             actor_id, actor_label, is_authenticated, status_code, response_size, \
             response_time_ms, error_message, exception_kind, metadata, requested_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&record.method)
        .bind(&record.path)
        .bind(Json(&record.query_params))
        .bind(&record.user_agent)
        .bind(&record.ip_address)
        .bind(record.actor_id)
        .bind(&record.actor_label)
        .bind(record.is_authenticated)
        .bind(record.status_code)
        .bind(record.response_size)
        .bind(record.response_time_ms)
        .bind(&record.error_message)
        .bind(&record.exception_kind)
        .bind(Json(&record.metadata))
        .bind(record.requested_at)
        .fetch_one(&self.pool)
        .await
        .map_err(persistence("Failed to store request record"))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiRequestRecord>> {
        sqlx::query_as::<_, ApiRequestRecord>("SELECT * FROM api_request_logs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence("Failed to find request record"))
    }

    async fn search(&self, query: &RequestLogQuery) -> AppResult<PageResponse<ApiRequestRecord>> {
        let page = query.page.normalized();

        let mut count_qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM api_request_logs");
        push_filters(&mut count_qb, query);
        let total: i64 = count_qb
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(persistence("Failed to count request records"))?;

        let mut select_qb = QueryBuilder::<Postgres>::new("SELECT * FROM api_request_logs");
        push_filters(&mut select_qb, query);
        select_qb
            .push(" ORDER BY ")
            .push(query.ordering.as_sql())
            .push(" LIMIT ")
            .push_bind(page.limit() as i64)
            .push(" OFFSET ")
            .push_bind(page.offset() as i64);
        let records = select_qb
            .build_query_as::<ApiRequestRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(persistence("Failed to search request records"))?;

        Ok(PageResponse::new(records, page, total as u64))
    }

    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM api_request_logs WHERE $1::timestamptz IS NULL OR created_at >= $1",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(persistence("Failed to count request records"))?;
        Ok(count as u64)
    }

    async fn aggregate_window(
        &self,
        since: DateTime<Utc>,
        top_n: usize,
    ) -> AppResult<WindowAggregate> {
        let (total, success, avg, min, max): (i64, i64, Option<f64>, Option<f64>, Option<f64>) =
            sqlx::query_as(
                "SELECT COUNT(*), COUNT(*) FILTER (WHERE status_code < 400), \
                 AVG(response_time_ms), MIN(response_time_ms), MAX(response_time_ms) \
                 FROM api_request_logs WHERE created_at >= $1",
            )
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(persistence("Failed to aggregate request records"))?;

        let endpoints: Vec<(String, String, i64, f64)> = sqlx::query_as(
            "SELECT method, path, COUNT(*) AS hits, AVG(response_time_ms) \
             FROM api_request_logs WHERE created_at >= $1 \
             GROUP BY method, path ORDER BY hits DESC, path ASC, method ASC LIMIT $2",
        )
        .bind(since)
        .bind(top_n as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence("Failed to aggregate endpoints"))?;

        let errors: Vec<(i32, i64)> = sqlx::query_as(
            "SELECT status_code, COUNT(*) FROM api_request_logs \
             WHERE created_at >= $1 AND status_code >= 400 GROUP BY status_code",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence("Failed to aggregate error statuses"))?;

        Ok(WindowAggregate {
            total: total as u64,
            success: success as u64,
            avg_response_time_ms: avg,
            min_response_time_ms: min,
            max_response_time_ms: max,
            endpoints: endpoints
                .into_iter()
                .map(|(method, path, count, avg)| EndpointStat {
                    method,
                    path,
                    count: count as u64,
                    avg_response_time_ms: avg,
                })
                .collect(),
            errors: errors
                .into_iter()
                .map(|(status_code, count)| StatusCount {
                    status_code,
                    count: count as u64,
                })
                .collect(),
        })
    }

    async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("UPDATE api_request_logs SET actor_id = NULL WHERE actor_id = $1")
            .bind(actor_id)
            .execute(&self.pool)
            .await
            .map_err(persistence("Failed to detach request actor"))?;
        Ok(result.rows_affected())
    }
}
