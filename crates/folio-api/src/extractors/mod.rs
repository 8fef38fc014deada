//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod json;
pub mod pagination;
pub mod path;

pub use auth::AuthUser;
pub use client::client_ip;
pub use json::{ApiJson, ApiQuery};
pub use pagination::PaginationParams;
pub use path::parse_uuid;
