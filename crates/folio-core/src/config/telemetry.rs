//! Request telemetry configuration.

use serde::{Deserialize, Serialize};

/// Settings for per-request telemetry and analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether the HTTP middleware records requests.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path prefixes that are never recorded.
    #[serde(default = "default_excluded")]
    pub excluded_prefixes: Vec<String>,
    /// Analytics window when the caller does not pass one.
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,
    /// Number of endpoints in the analytics top list.
    #[serde(default = "default_top_endpoints")]
    pub top_endpoints: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excluded_prefixes: default_excluded(),
            default_window_days: default_window_days(),
            top_endpoints: default_top_endpoints(),
        }
    }
}

impl TelemetryConfig {
    /// Whether a request path should be skipped by the recorder.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

fn default_true() -> bool {
    true
}

fn default_excluded() -> Vec<String> {
    vec!["/static/".to_string(), "/media/".to_string(), "/favicon.ico".to_string()]
}

fn default_window_days() -> u32 {
    30
}

fn default_top_endpoints() -> usize {
    10
}
