//! Admin-only handlers. Every handler requires the admin role.

pub mod actors;
pub mod api_logs;
pub mod audit;
pub mod health_checks;
pub mod settings;
pub mod stats;
