//! Audited action enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use folio_core::AppError;

/// What happened to the audited entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    View,
    Login,
    Logout,
    Download,
    Upload,
    Export,
    Import,
    Approve,
    Reject,
    Publish,
    Unpublish,
    Other,
}

impl AuditAction {
    /// Every action, in declaration order.
    pub const ALL: [AuditAction; 15] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::View,
        Self::Login,
        Self::Logout,
        Self::Download,
        Self::Upload,
        Self::Export,
        Self::Import,
        Self::Approve,
        Self::Reject,
        Self::Publish,
        Self::Unpublish,
        Self::Other,
    ];

    /// Stored (wire) form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::View => "view",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Export => "export",
            Self::Import => "import",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
            Self::Other => "other",
        }
    }

    /// Human-readable name, used when generating descriptions.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::View => "View",
            Self::Login => "Login",
            Self::Logout => "Logout",
            Self::Download => "Download",
            Self::Upload => "Upload",
            Self::Export => "Export",
            Self::Import => "Import",
            Self::Approve => "Approve",
            Self::Reject => "Reject",
            Self::Publish => "Publish",
            Self::Unpublish => "Unpublish",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == needle)
            .ok_or_else(|| AppError::validation(format!("Invalid audit action: '{s}'")))
    }
}

impl TryFrom<String> for AuditAction {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
