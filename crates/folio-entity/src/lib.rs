//! # folio-entity
//!
//! Domain entity models for Folio. Every struct in this crate represents a
//! database table row or a domain value object. All entities derive `Debug`,
//! `Clone`, `Serialize`, `Deserialize`, and append-only records additionally
//! derive `sqlx::FromRow`.

pub mod audit;
pub mod health;
pub mod request_log;
pub mod settings;
pub mod stats;
pub mod user;
