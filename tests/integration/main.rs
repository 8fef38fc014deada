//! HTTP integration tests driving the full router over in-memory stores.

mod helpers;

mod audit_test;
mod auth_test;
mod health_test;
mod settings_test;
mod stats_test;
mod telemetry_test;
