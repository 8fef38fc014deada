//! # folio-api
//!
//! HTTP API layer for Folio built on Axum.
//!
//! Provides the public health and system-info endpoints, the admin
//! endpoints over settings, audit, telemetry, health history and stats,
//! the request telemetry middleware, extractors, DTOs and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, init_state, run_server};
pub use error::ApiError;
pub use state::AppState;
