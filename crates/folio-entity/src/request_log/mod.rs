//! API request telemetry entities.

pub mod analytics;
pub mod model;

pub use analytics::{AnalyticsReport, EndpointStat, StatusCount, WindowAggregate};
pub use model::{ApiRequestRecord, NewApiRequestRecord, RequestLogQuery, RequestOrdering};
