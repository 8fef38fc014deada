//! Cache key builders for every Folio cache entry.

use uuid::Uuid;

/// Public projection of the system settings.
pub fn system_info() -> String {
    "settings:system:public".to_string()
}

/// Throwaway key written and removed by one cache health probe.
pub fn health_probe(prefix: &str, nonce: Uuid) -> String {
    format!("{prefix}:{nonce}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_keys_are_unique() {
        let a = health_probe("health_check", Uuid::new_v4());
        let b = health_probe("health_check", Uuid::new_v4());
        assert_ne!(a, b);
        assert!(a.starts_with("health_check:"));
    }
}
