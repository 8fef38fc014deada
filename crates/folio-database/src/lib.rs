//! # folio-database
//!
//! Persistence for the Folio core. The [`store`] module defines one trait
//! per concern; [`repositories`] implements them on PostgreSQL and
//! [`memory`] implements them in process. [`Stores`] picks a backend from
//! configuration.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use store::{
    AuditStore, ContentCounter, DatabaseProbe, HealthStore, RequestLogStore, SingletonStore,
};
pub use stores::Stores;
