//! Sorting types for list endpoints.

use serde::{Deserialize, Serialize};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Return the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

/// Parse `"-created_at"` / `"created_at"` style ordering strings.
///
/// Returns the bare field name and the direction; a leading `-` means
/// descending.
pub fn parse_ordering(raw: &str) -> (&str, SortDirection) {
    match raw.strip_prefix('-') {
        Some(field) => (field, SortDirection::Desc),
        None => (raw, SortDirection::Asc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordering() {
        assert_eq!(parse_ordering("-created_at"), ("created_at", SortDirection::Desc));
        assert_eq!(parse_ordering("severity"), ("severity", SortDirection::Asc));
    }

    #[test]
    fn test_apply_reverses_for_desc() {
        use std::cmp::Ordering;
        assert_eq!(SortDirection::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Asc.apply(Ordering::Less), Ordering::Less);
    }
}
