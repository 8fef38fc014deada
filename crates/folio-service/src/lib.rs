//! # folio-service
//!
//! Business logic service layer for Folio. Each service orchestrates the
//! stores, cache and storage providers to implement one concern: settings
//! singletons, the audit trail, health probing, request telemetry and
//! dashboard statistics.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod audit;
pub mod context;
pub mod health;
pub mod resources;
pub mod settings;
pub mod singleton;
pub mod stats;
pub mod telemetry;

pub use audit::{AuditOptions, AuditService};
pub use context::RequestContext;
pub use health::{
    CacheCheck, CheckOutcome, DatabaseCheck, HealthCheck, HealthReport, HealthService,
    ResourceCheck, StorageCheck,
};
pub use resources::{HostInfo, ResourceSampler, SysinfoSampler};
pub use settings::SettingsService;
pub use singleton::SingletonService;
pub use stats::StatsService;
pub use telemetry::{RequestInfo, RequestOptions, ResponseInfo, TelemetryService};
