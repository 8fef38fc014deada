//! # folio-core
//!
//! Core crate for Folio. Contains the cache and storage traits,
//! configuration schemas, pagination/sorting/JSON helper types, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Folio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind, FieldError};
pub use result::AppResult;
