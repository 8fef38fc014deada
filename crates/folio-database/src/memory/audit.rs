//! In-memory audit store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_core::types::PageResponse;
use folio_entity::audit::{AuditEntry, AuditQuery, NewAuditEntry};

use super::next_timestamp;
use crate::store::AuditStore;

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<AuditEntry>,
    next_seq: i64,
}

/// Audit entries in insertion order. `created_at` is strictly increasing.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    inner: RwLock<Inner>,
}

impl MemoryAuditStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, entry: NewAuditEntry) -> AppResult<AuditEntry> {
        let mut inner = self.inner.write().await;
        inner.next_seq += 1;
        let seq = inner.next_seq;
        let created_at = next_timestamp(inner.entries.last().map(|e| e.created_at));
        let stored = entry.into_entry(Uuid::new_v4(), seq, created_at);
        inner.entries.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<AuditEntry>> {
        let inner = self.inner.read().await;
        Ok(inner.entries.iter().find(|e| e.id == id).cloned())
    }

    async fn search(&self, query: &AuditQuery) -> AppResult<PageResponse<AuditEntry>> {
        let inner = self.inner.read().await;
        let mut matched: Vec<AuditEntry> = inner
            .entries
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();
        matched.sort_by(|a, b| query.ordering.compare(a, b));
        Ok(PageResponse::from_sorted(matched, query.page.normalized()))
    }

    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .filter(|e| since.is_none_or(|s| e.created_at >= s))
            .count() as u64)
    }

    async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64> {
        let mut inner = self.inner.write().await;
        let mut touched = 0;
        for entry in inner.entries.iter_mut().filter(|e| e.actor_id == Some(actor_id)) {
            entry.actor_id = None;
            touched += 1;
        }
        Ok(touched)
    }
}
