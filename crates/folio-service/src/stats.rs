//! Cross-entity statistics for the admin dashboard.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::warn;

use folio_core::result::AppResult;
use folio_database::store::{AuditStore, ContentCounter, DatabaseProbe, RequestLogStore};
use folio_entity::stats::{
    CountTarget, RecentCounts, ResourceSample, SystemStats, Totals, UNKNOWN_DATABASE_SIZE,
};

use crate::resources::ResourceSampler;

/// Days covered by the "recent" counters.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Builds [`SystemStats`] snapshots. Nothing is cached.
#[derive(Debug, Clone)]
pub struct StatsService {
    content: Arc<dyn ContentCounter>,
    audit: Arc<dyn AuditStore>,
    requests: Arc<dyn RequestLogStore>,
    probe: Arc<dyn DatabaseProbe>,
    sampler: Option<Arc<dyn ResourceSampler>>,
}

impl StatsService {
    /// Creates a new stats service. Without a sampler the snapshot carries
    /// no resource figures.
    pub fn new(
        content: Arc<dyn ContentCounter>,
        audit: Arc<dyn AuditStore>,
        requests: Arc<dyn RequestLogStore>,
        probe: Arc<dyn DatabaseProbe>,
        sampler: Option<Arc<dyn ResourceSampler>>,
    ) -> Self {
        Self {
            content,
            audit,
            requests,
            probe,
            sampler,
        }
    }

    /// Counts, recent activity, live resources and database size.
    ///
    /// Count failures propagate. Resource sampling and database size are
    /// best effort.
    pub async fn snapshot(&self) -> AppResult<SystemStats> {
        let generated_at = Utc::now();
        let since = Some(generated_at - Duration::days(RECENT_WINDOW_DAYS));
        let c = &self.content;

        let (users, articles, published_articles, portfolio_items, published_portfolio_items) =
            tokio::try_join!(
                c.count(CountTarget::Users, None),
                c.count(CountTarget::Articles, None),
                c.count(CountTarget::PublishedArticles, None),
                c.count(CountTarget::PortfolioItems, None),
                c.count(CountTarget::PublishedPortfolioItems, None),
            )?;
        let (contact_messages, unread_messages, files, total_file_size, audit_entries, api_requests) =
            tokio::try_join!(
                c.count(CountTarget::ContactMessages, None),
                c.count(CountTarget::UnreadContactMessages, None),
                c.count(CountTarget::Files, None),
                c.total_file_size(),
                self.audit.count_since(None),
                self.requests.count_since(None),
            )?;

        let recent = {
            let (users, articles, portfolio_items, contact_messages, files) = tokio::try_join!(
                c.count(CountTarget::Users, since),
                c.count(CountTarget::Articles, since),
                c.count(CountTarget::PortfolioItems, since),
                c.count(CountTarget::ContactMessages, since),
                c.count(CountTarget::Files, since),
            )?;
            RecentCounts {
                users,
                articles,
                portfolio_items,
                contact_messages,
                files,
            }
        };

        let (resources, database_size) = tokio::join!(self.resources(), self.database_size());

        Ok(SystemStats {
            totals: Totals {
                users,
                articles,
                published_articles,
                portfolio_items,
                published_portfolio_items,
                contact_messages,
                unread_messages,
                files,
                total_file_size,
                audit_entries,
                api_requests,
            },
            recent,
            resources,
            database_size,
            generated_at,
        })
    }

    async fn resources(&self) -> Option<ResourceSample> {
        let sampler = self.sampler.as_ref()?;
        match sampler.sample().await {
            Ok(sample) => Some(sample),
            Err(e) => {
                warn!(error = %e, "Resource sampling failed");
                None
            }
        }
    }

    async fn database_size(&self) -> String {
        match self.probe.database_size().await {
            Ok(Some(size)) => size,
            Ok(None) => UNKNOWN_DATABASE_SIZE.to_string(),
            Err(e) => {
                warn!(error = %e, "Could not read database size");
                UNKNOWN_DATABASE_SIZE.to_string()
            }
        }
    }
}
