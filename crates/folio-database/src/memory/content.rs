//! In-memory content counter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use folio_core::result::AppResult;
use folio_entity::stats::CountTarget;

use crate::store::ContentCounter;

/// One collaborator-owned row as seen by the counter.
#[derive(Debug, Clone)]
pub enum ContentItem {
    User { created_at: DateTime<Utc> },
    Article { created_at: DateTime<Utc>, published: bool },
    PortfolioItem { created_at: DateTime<Utc>, published: bool },
    ContactMessage { created_at: DateTime<Utc>, unread: bool },
    File { created_at: DateTime<Utc>, size: u64 },
}

impl ContentItem {
    fn created_at(&self) -> DateTime<Utc> {
        match self {
            Self::User { created_at }
            | Self::Article { created_at, .. }
            | Self::PortfolioItem { created_at, .. }
            | Self::ContactMessage { created_at, .. }
            | Self::File { created_at, .. } => *created_at,
        }
    }

    fn counts_for(&self, target: CountTarget) -> bool {
        match (target, self) {
            (CountTarget::Users, Self::User { .. })
            | (CountTarget::Articles, Self::Article { .. })
            | (CountTarget::PortfolioItems, Self::PortfolioItem { .. })
            | (CountTarget::ContactMessages, Self::ContactMessage { .. })
            | (CountTarget::Files, Self::File { .. }) => true,
            (CountTarget::PublishedArticles, Self::Article { published, .. })
            | (CountTarget::PublishedPortfolioItems, Self::PortfolioItem { published, .. }) => {
                *published
            }
            (CountTarget::UnreadContactMessages, Self::ContactMessage { unread, .. }) => *unread,
            _ => false,
        }
    }
}

/// Content rows seeded by tests or local tooling.
#[derive(Debug, Default)]
pub struct MemoryContentCounter {
    items: RwLock<Vec<ContentItem>>,
}

impl MemoryContentCounter {
    /// An empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a content row.
    pub async fn add(&self, item: ContentItem) {
        self.items.write().await.push(item);
    }
}

#[async_trait]
impl ContentCounter for MemoryContentCounter {
    async fn count(&self, target: CountTarget, since: Option<DateTime<Utc>>) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .filter(|i| i.counts_for(target))
            .filter(|i| since.is_none_or(|s| i.created_at() >= s))
            .count() as u64)
    }

    async fn total_file_size(&self) -> AppResult<u64> {
        let items = self.items.read().await;
        Ok(items
            .iter()
            .map(|i| match i {
                ContentItem::File { size, .. } => *size,
                _ => 0,
            })
            .sum())
    }
}
