//! User role enumeration and the actor snapshot carried by requests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Roles assigned by the account collaborator.
///
/// Roles are ordered by privilege level: Admin > Editor > Author > Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full administrator; may read audit, telemetry and stats.
    Admin,
    /// Manages content.
    Editor,
    /// Writes content.
    Author,
    /// Read-only.
    Viewer,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 4,
            Self::Editor => 3,
            Self::Author => 2,
            Self::Viewer => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Author => "author",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = folio_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "author" => Ok(Self::Author),
            "viewer" => Ok(Self::Viewer),
            _ => Err(folio_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, editor, author, viewer"
            ))),
        }
    }
}

/// The acting account as known at the time of an event.
///
/// `label` is a snapshot (usually the email) so audit and telemetry rows stay
/// searchable after the account is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Account identifier.
    pub id: Uuid,
    /// Display identity snapshot.
    pub label: String,
    /// Role at the time of the event.
    pub role: UserRole,
}

impl Actor {
    /// Create an actor snapshot.
    pub fn new(id: Uuid, label: impl Into<String>, role: UserRole) -> Self {
        Self {
            id,
            label: label.into(),
            role,
        }
    }
}
