//! Audit severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use folio_core::AppError;

/// Severity of an audited event. Ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Numeric rank used for ordering (higher = more severe).
    pub fn rank(&self) -> i16 {
        match self {
            Self::Info => 0,
            Self::Warning => 1,
            Self::Error => 2,
            Self::Critical => 3,
        }
    }

    /// Whether this severity warrants attention.
    pub fn is_high(&self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }

    /// Stored (wire) form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(AppError::validation(format!(
                "Invalid severity: '{s}'. Expected one of: info, warning, error, critical"
            ))),
        }
    }
}

impl TryFrom<String> for Severity {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, AppError> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_matches_rank() {
        assert!(Severity::Critical > Severity::Error);
        assert!(Severity::Warning > Severity::Info);
        assert_eq!(Severity::Critical.rank(), 3);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert_eq!("WARNING".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_try_from_string() {
        assert_eq!(Severity::try_from("error".to_string()).unwrap(), Severity::Error);
        assert!(Severity::try_from(String::new()).is_err());
    }
}
