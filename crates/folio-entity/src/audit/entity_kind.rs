//! Audited entity kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use folio_core::AppError;

/// The kind of record an audit entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Article,
    Portfolio,
    Service,
    File,
    ContactMessage,
    Tag,
    Category,
    System,
    Auth,
    Api,
}

impl EntityKind {
    /// Every kind, in declaration order.
    pub const ALL: [EntityKind; 11] = [
        Self::User,
        Self::Article,
        Self::Portfolio,
        Self::Service,
        Self::File,
        Self::ContactMessage,
        Self::Tag,
        Self::Category,
        Self::System,
        Self::Auth,
        Self::Api,
    ];

    /// Stored (wire) form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Article => "article",
            Self::Portfolio => "portfolio",
            Self::Service => "service",
            Self::File => "file",
            Self::ContactMessage => "contact_message",
            Self::Tag => "tag",
            Self::Category => "category",
            Self::System => "system",
            Self::Auth => "auth",
            Self::Api => "api",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Article => "Article",
            Self::Portfolio => "Portfolio Item",
            Self::Service => "Service",
            Self::File => "File",
            Self::ContactMessage => "Contact Message",
            Self::Tag => "Tag",
            Self::Category => "Category",
            Self::System => "System",
            Self::Auth => "Authentication",
            Self::Api => "API",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == needle)
            .ok_or_else(|| AppError::validation(format!("Invalid entity kind: '{s}'")))
    }
}

impl TryFrom<String> for EntityKind {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
