//! Axum middleware stack.

pub mod cors;
pub mod rbac;
pub mod telemetry;
