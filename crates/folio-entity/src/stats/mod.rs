//! Cross-entity statistics snapshots.

pub mod model;

pub use model::{
    CountTarget, RecentCounts, ResourceSample, SystemStats, Totals, UNKNOWN_DATABASE_SIZE,
};
