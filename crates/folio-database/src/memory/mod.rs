//! In-process implementations of the store traits.
//!
//! Used by tests and by `database.backend = "memory"` for local runs. State
//! lives for the lifetime of the process.

pub mod audit;
pub mod content;
pub mod health;
pub mod probe;
pub mod request_log;
pub mod singleton;

pub use audit::MemoryAuditStore;
pub use content::{ContentItem, MemoryContentCounter};
pub use health::MemoryHealthStore;
pub use probe::MemoryDatabaseProbe;
pub use request_log::MemoryRequestLogStore;
pub use singleton::MemorySingletonStore;

use chrono::{DateTime, Duration, Utc};

/// A timestamp strictly after `last`, as close to now as possible.
pub(crate) fn next_timestamp(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last {
        Some(prev) if now <= prev => prev + Duration::microseconds(1),
        _ => now,
    }
}
