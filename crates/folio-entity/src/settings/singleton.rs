//! The envelope around a singleton record.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A record type of which exactly one row exists.
///
/// The row is created from [`Default`] on first access and replaced as a
/// whole afterwards.
pub trait SingletonEntity:
    Serialize
    + DeserializeOwned
    + Validate
    + Default
    + Clone
    + std::fmt::Debug
    + Unpin
    + Send
    + Sync
    + 'static
{
    /// Stable name used in logs, cache keys and audit entity ids.
    const KIND: &'static str;

    /// Backing table in PostgreSQL.
    const TABLE: &'static str;

    /// Fill derived fields and canonicalize blanks before validation.
    fn normalize(&mut self) {}
}

/// One singleton row: identity and timestamps around the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "T: Serialize + DeserializeOwned")]
pub struct Singleton<T> {
    /// Row identity, fixed at creation.
    pub id: Uuid,
    /// The record itself, flattened into the envelope on the wire.
    #[serde(flatten)]
    pub value: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: SingletonEntity> Singleton<T> {
    /// A fresh row holding the defaults.
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            value: T::default(),
            created_at: now,
            updated_at: now,
        }
    }
}
