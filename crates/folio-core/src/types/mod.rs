//! Core type definitions used across the Folio workspace.

pub mod json;
pub mod pagination;
pub mod sorting;

pub use json::JsonMap;
pub use pagination::{PageRequest, PageResponse};
pub use sorting::SortDirection;
