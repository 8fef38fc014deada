//! Health check result entities.

pub mod model;

pub use model::{CheckKind, HealthCheckResult, NewHealthCheckResult};
