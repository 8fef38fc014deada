//! Audit trail entities.

pub mod action;
pub mod changes;
pub mod entity_kind;
pub mod model;
pub mod severity;

pub use action::AuditAction;
pub use changes::{AuditChanges, FieldChange};
pub use entity_kind::EntityKind;
pub use model::{AuditEntry, AuditOrdering, AuditQuery, NewAuditEntry};
pub use severity::Severity;
