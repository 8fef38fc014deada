//! PostgreSQL implementations of the store traits.

pub mod audit;
pub mod content;
pub mod health;
pub mod probe;
pub mod request_log;
pub mod singleton;

pub use audit::AuditLogRepository;
pub use content::ContentCountRepository;
pub use health::HealthCheckRepository;
pub use probe::PgDatabaseProbe;
pub use request_log::RequestLogRepository;
pub use singleton::SingletonRepository;

/// Build an `ILIKE` pattern matching `term` anywhere, with wildcards in the
/// term escaped.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
