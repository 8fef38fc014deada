//! Actor identity as seen by the core.
//!
//! Accounts are owned by an external collaborator; the core only keeps weak
//! references to them.

pub mod role;

pub use role::{Actor, UserRole};
