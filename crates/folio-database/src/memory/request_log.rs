//! In-memory request telemetry store.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::result::AppResult;
use folio_core::types::PageResponse;
use folio_entity::request_log::{
    ApiRequestRecord, EndpointStat, NewApiRequestRecord, RequestLogQuery, StatusCount,
    WindowAggregate,
};

use super::next_timestamp;
use crate::store::RequestLogStore;

/// Request records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRequestLogStore {
    records: RwLock<Vec<ApiRequestRecord>>,
}

impl MemoryRequestLogStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RequestLogStore for MemoryRequestLogStore {
    async fn insert(&self, record: NewApiRequestRecord) -> AppResult<ApiRequestRecord> {
        let mut records = self.records.write().await;
        let created_at = next_timestamp(records.last().map(|r| r.created_at));
        let stored = record.into_record(Uuid::new_v4(), created_at);
        records.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ApiRequestRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn search(&self, query: &RequestLogQuery) -> AppResult<PageResponse<ApiRequestRecord>> {
        let records = self.records.read().await;
        let mut matched: Vec<ApiRequestRecord> =
            records.iter().filter(|r| query.matches(r)).cloned().collect();
        matched.sort_by(|a, b| query.ordering.compare(a, b));
        Ok(PageResponse::from_sorted(matched, query.page.normalized()))
    }

    async fn count_since(&self, since: Option<DateTime<Utc>>) -> AppResult<u64> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| since.is_none_or(|s| r.created_at >= s))
            .count() as u64)
    }

    async fn aggregate_window(
        &self,
        since: DateTime<Utc>,
        top_n: usize,
    ) -> AppResult<WindowAggregate> {
        let records = self.records.read().await;
        let window: Vec<&ApiRequestRecord> =
            records.iter().filter(|r| r.created_at >= since).collect();

        let mut agg = WindowAggregate {
            total: window.len() as u64,
            success: window.iter().filter(|r| r.is_success()).count() as u64,
            ..Default::default()
        };
        if window.is_empty() {
            return Ok(agg);
        }

        let times = window.iter().map(|r| r.response_time_ms);
        agg.avg_response_time_ms = Some(times.clone().sum::<f64>() / window.len() as f64);
        agg.min_response_time_ms = times.clone().reduce(f64::min);
        agg.max_response_time_ms = times.reduce(f64::max);

        let mut groups: HashMap<(&str, &str), (u64, f64)> = HashMap::new();
        let mut errors: BTreeMap<i32, u64> = BTreeMap::new();
        for r in &window {
            let slot = groups.entry((r.method.as_str(), r.path.as_str())).or_default();
            slot.0 += 1;
            slot.1 += r.response_time_ms;
            if !r.is_success() {
                *errors.entry(r.status_code).or_default() += 1;
            }
        }

        let mut endpoints: Vec<EndpointStat> = groups
            .into_iter()
            .map(|((method, path), (count, sum))| EndpointStat {
                method: method.to_string(),
                path: path.to_string(),
                count,
                avg_response_time_ms: sum / count as f64,
            })
            .collect();
        endpoints.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| a.method.cmp(&b.method))
        });
        endpoints.truncate(top_n);
        agg.endpoints = endpoints;
        agg.errors = errors
            .into_iter()
            .map(|(status_code, count)| StatusCount { status_code, count })
            .collect();
        Ok(agg)
    }

    async fn detach_actor(&self, actor_id: Uuid) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let mut touched = 0;
        for record in records.iter_mut().filter(|r| r.actor_id == Some(actor_id)) {
            record.actor_id = None;
            touched += 1;
        }
        Ok(touched)
    }
}
