//! Opaque JSON payloads.

/// A JSON object with untrusted keys, used for payloads and metadata.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Coerce an arbitrary JSON value into an object.
///
/// Objects pass through; `null` becomes an empty object; any other value is
/// wrapped under a `"value"` key.
pub fn into_object(value: serde_json::Value) -> JsonMap {
    match value {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => JsonMap::new(),
        other => {
            let mut map = JsonMap::new();
            map.insert("value".to_string(), other);
            map
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_object() {
        assert!(into_object(json!(null)).is_empty());
        assert_eq!(into_object(json!({"a": 1}))["a"], json!(1));
        assert_eq!(into_object(json!([1, 2]))["value"], json!([1, 2]));
    }
}
