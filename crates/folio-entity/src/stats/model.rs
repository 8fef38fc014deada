//! Statistics snapshot returned to the admin dashboard.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database size reported when the backend cannot tell.
pub const UNKNOWN_DATABASE_SIZE: &str = "Unknown";

/// Collaborator-owned tables the aggregator counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountTarget {
    Users,
    Articles,
    PublishedArticles,
    PortfolioItems,
    PublishedPortfolioItems,
    ContactMessages,
    /// Contact messages still in the `new` state.
    UnreadContactMessages,
    Files,
}

impl CountTarget {
    /// Stable name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Articles => "articles",
            Self::PublishedArticles => "published_articles",
            Self::PortfolioItems => "portfolio_items",
            Self::PublishedPortfolioItems => "published_portfolio_items",
            Self::ContactMessages => "contact_messages",
            Self::UnreadContactMessages => "unread_contact_messages",
            Self::Files => "files",
        }
    }
}

impl fmt::Display for CountTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All-time totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub users: u64,
    pub articles: u64,
    pub published_articles: u64,
    pub portfolio_items: u64,
    pub published_portfolio_items: u64,
    pub contact_messages: u64,
    pub unread_messages: u64,
    pub files: u64,
    /// Sum of stored file sizes in bytes.
    pub total_file_size: u64,
    pub audit_entries: u64,
    pub api_requests: u64,
}

/// Rows created in the trailing seven days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentCounts {
    pub users: u64,
    pub articles: u64,
    pub portfolio_items: u64,
    pub contact_messages: u64,
    pub files: u64,
}

/// A point-in-time host utilisation sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSample {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub memory_available_gb: f64,
    pub disk_free_gb: f64,
    pub boot_time: Option<DateTime<Utc>>,
}

/// Everything the dashboard shows in one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub totals: Totals,
    pub recent: RecentCounts,
    /// `None` when sampling is disabled or failed.
    pub resources: Option<ResourceSample>,
    /// Human-readable size, or `"Unknown"`.
    pub database_size: String,
    pub generated_at: DateTime<Utc>,
}
