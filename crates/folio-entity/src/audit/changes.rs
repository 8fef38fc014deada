//! Field-level change maps recorded with update actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Before/after values of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    /// Value before the change.
    pub before: Value,
    /// Value after the change.
    pub after: Value,
}

impl FieldChange {
    /// Create a field change.
    pub fn new(before: Value, after: Value) -> Self {
        Self { before, after }
    }
}

/// Accepted input shapes: `{"before": .., "after": ..}` or the legacy
/// two-element `[old, new]` array.
#[derive(Deserialize)]
#[serde(untagged)]
enum FieldChangeRepr {
    Object { before: Value, after: Value },
    Pair(Value, Value),
}

impl<'de> Deserialize<'de> for FieldChange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match FieldChangeRepr::deserialize(deserializer)? {
            FieldChangeRepr::Object { before, after } | FieldChangeRepr::Pair(before, after) => {
                Ok(Self { before, after })
            }
        }
    }
}

/// Field name → change, ordered by field name.
pub type AuditChanges = BTreeMap<String, FieldChange>;

/// Diff two JSON objects key by key.
///
/// Keys present in either side whose values differ are reported; a missing
/// key is treated as `null`. Non-object inputs are compared as a whole under
/// the `"value"` key.
pub fn diff_json(before: &Value, after: &Value) -> AuditChanges {
    let mut changes = AuditChanges::new();
    match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            for key in old.keys().chain(new.keys()) {
                if changes.contains_key(key) {
                    continue;
                }
                let o = old.get(key).cloned().unwrap_or(Value::Null);
                let n = new.get(key).cloned().unwrap_or(Value::Null);
                if o != n {
                    changes.insert(key.clone(), FieldChange::new(o, n));
                }
            }
        }
        _ if before != after => {
            changes.insert(
                "value".to_string(),
                FieldChange::new(before.clone(), after.clone()),
            );
        }
        _ => {}
    }
    changes
}

/// Render changes as `field: old → new; ...`, or `No changes`.
pub fn summarize(changes: &AuditChanges) -> String {
    if changes.is_empty() {
        return "No changes".to_string();
    }
    changes
        .iter()
        .map(|(field, c)| format!("{field}: {} → {}", render(&c.before), render(&c.after)))
        .collect::<Vec<_>>()
        .join("; ")
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_both_shapes() {
        let changes: AuditChanges = serde_json::from_value(json!({
            "title": {"before": "a", "after": "b"},
            "status": ["draft", "published"],
        }))
        .unwrap();
        assert_eq!(changes["title"].after, json!("b"));
        assert_eq!(changes["status"].before, json!("draft"));

        let out = serde_json::to_value(&changes).unwrap();
        assert_eq!(out["status"], json!({"before": "draft", "after": "published"}));
    }

    #[test]
    fn test_rejects_other_shapes() {
        let bad: Result<AuditChanges, _> = serde_json::from_value(json!({"title": "b"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_diff_json_reports_changed_and_removed_keys() {
        let changes = diff_json(
            &json!({"site_name": "A", "maintenance_mode": false, "gone": 1}),
            &json!({"site_name": "B", "maintenance_mode": false}),
        );
        assert_eq!(changes.len(), 2);
        assert_eq!(changes["site_name"], FieldChange::new(json!("A"), json!("B")));
        assert_eq!(changes["gone"].after, Value::Null);
    }

    #[test]
    fn test_summary() {
        let changes = diff_json(&json!({"a": "x"}), &json!({"a": "y"}));
        assert_eq!(summarize(&changes), "a: x → y");
        assert_eq!(summarize(&AuditChanges::new()), "No changes");
    }
}
