//! # folio-storage
//!
//! Media storage providers for Folio. The local filesystem provider backs
//! uploaded media and the storage health probe.

pub mod providers;

pub use providers::LocalStorageProvider;
