//! Health probe configuration.

use serde::{Deserialize, Serialize};

/// Settings for the aggregated health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Budget for a single sub-check in milliseconds.
    #[serde(default = "default_check_timeout")]
    pub check_timeout_ms: u64,
    /// CPU, memory and disk usage at or above this percentage fail the
    /// resource check.
    #[serde(default = "default_threshold")]
    pub resource_threshold_percent: f64,
    /// Whether the `system_resources` check runs at all.
    #[serde(default = "default_true")]
    pub sample_resources: bool,
    /// Key prefix for the throwaway cache round-trip.
    #[serde(default = "default_probe_key")]
    pub probe_key: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout_ms: default_check_timeout(),
            resource_threshold_percent: default_threshold(),
            sample_resources: true,
            probe_key: default_probe_key(),
        }
    }
}

fn default_check_timeout() -> u64 {
    3000
}

fn default_threshold() -> f64 {
    90.0
}

fn default_true() -> bool {
    true
}

fn default_probe_key() -> String {
    "health_check".to_string()
}
