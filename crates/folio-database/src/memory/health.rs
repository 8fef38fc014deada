//! In-memory health check history.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_core::types::{PageRequest, PageResponse};
use folio_entity::health::{CheckKind, HealthCheckResult, NewHealthCheckResult};

use super::next_timestamp;
use crate::store::HealthStore;

/// Health results in insertion order.
#[derive(Debug, Default)]
pub struct MemoryHealthStore {
    results: RwLock<Vec<HealthCheckResult>>,
}

impl MemoryHealthStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HealthStore for MemoryHealthStore {
    async fn insert(&self, result: NewHealthCheckResult) -> AppResult<HealthCheckResult> {
        let mut results = self.results.write().await;
        let created_at = next_timestamp(results.last().map(|r| r.created_at));
        let stored = result.into_result(Uuid::new_v4(), created_at);
        results.push(stored.clone());
        Ok(stored)
    }

    async fn recent(
        &self,
        kind: Option<CheckKind>,
        page: PageRequest,
    ) -> AppResult<PageResponse<HealthCheckResult>> {
        let results = self.results.read().await;
        let matched: Vec<HealthCheckResult> = results
            .iter()
            .rev()
            .filter(|r| kind.is_none_or(|k| r.check_kind == k))
            .cloned()
            .collect();
        Ok(PageResponse::from_sorted(matched, page.normalized()))
    }
}
