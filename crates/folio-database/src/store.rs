//! Store traits shared by the PostgreSQL and in-memory backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_core::types::{PageRequest, PageResponse};
use folio_entity::audit::{AuditEntry, AuditQuery, NewAuditEntry};
use folio_entity::health::{CheckKind, HealthCheckResult, NewHealthCheckResult};
use folio_entity::request_log::{
    ApiRequestRecord, NewApiRequestRecord, RequestLogQuery, WindowAggregate,
};
use folio_entity::settings::{Singleton, SingletonEntity};
use folio_entity::stats::CountTarget;

/// Holds the single row of a singleton record type.
///
/// Implementations guarantee that concurrent first calls to
/// [`get_or_create`](Self::get_or_create) converge on one row, and that
/// when several rows exist anyway the earliest-created one (ties by id) is
/// the one read and written.
#[async_trait]
pub trait SingletonStore<T: SingletonEntity>: Send + Sync + std::fmt::Debug + 'static {
    /// Return the row, inserting `T::default()` if none exists.
    async fn get_or_create(&self) -> AppResult<Singleton<T>>;

    /// Overwrite the row's value and bump `updated_at`. Creates the row
    /// first if needed; never creates a second one.
    async fn replace(&self, value: T) -> AppResult<Singleton<T>>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert an entry, assigning id, `seq` and `created_at`.
    async fn insert(&self, entry: NewAuditEntry) -> AppResult<AuditEntry>;

    /// Find an entry by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>>;

    /// Filter, order and page entries.
    async fn search(&self, query: &AuditQuery) -> AppResult<PageResponse<AuditEntry>>;

    /// Count entries created at or after `since` (all entries when `None`).
    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<u64>;

    /// Null out `actor_id` on every entry of a removed actor.
    async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64>;
}

/// Append-only health probe history.
#[async_trait]
pub trait HealthStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a result, assigning id and `created_at`.
    async fn insert(&self, result: NewHealthCheckResult) -> AppResult<HealthCheckResult>;

    /// Newest-first page of results, optionally for one kind.
    async fn recent(
        &self,
        kind: Option<CheckKind>,
        page: PageRequest,
    ) -> AppResult<PageResponse<HealthCheckResult>>;
}

/// Append-only request telemetry.
#[async_trait]
pub trait RequestLogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a record, assigning id and `created_at`.
    async fn insert(&self, record: NewApiRequestRecord) -> AppResult<ApiRequestRecord>;

    /// Find a record by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiRequestRecord>>;

    /// Filter, order and page records.
    async fn search(&self, query: &RequestLogQuery) -> AppResult<PageResponse<ApiRequestRecord>>;

    /// Count records created at or after `since` (all records when `None`).
    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<u64>;

    /// Raw figures for records created at or after `since`. At most
    /// `top_n` endpoint groups are returned, busiest first.
    async fn aggregate_window(&self, since: DateTime<Utc>, top_n: usize)
    -> AppResult<WindowAggregate>;

    /// Null out `actor_id` on every record of a removed actor.
    async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64>;
}

/// Read-only counts over collaborator-owned content.
#[async_trait]
pub trait ContentCounter: Send + Sync + std::fmt::Debug + 'static {
    /// Rows of `target`, optionally only those created at or after `since`.
    async fn count(&self, target: CountTarget, since: Option<DateTime<Utc>>) -> AppResult<u64>;

    /// Sum of stored file sizes in bytes.
    async fn total_file_size(&self) -> AppResult<u64>;
}

/// Liveness and size of the backing database.
#[async_trait]
pub trait DatabaseProbe: Send + Sync + std::fmt::Debug + 'static {
    /// Cheapest possible round-trip.
    async fn ping(&self) -> AppResult<()>;

    /// Human-readable size, or `None` when the backend cannot tell.
    async fn database_size(&self) -> AppResult<Option<String>>;
}
