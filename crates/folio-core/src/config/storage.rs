//! Storage provider configuration.

use serde::{Deserialize, Serialize};

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root path for the local filesystem provider.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Directory (relative to the root) used for health probe objects.
    #[serde(default = "default_probe_dir")]
    pub probe_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            probe_dir: default_probe_dir(),
        }
    }
}

fn default_local_root() -> String {
    "./data/media".to_string()
}

fn default_probe_dir() -> String {
    ".health".to_string()
}
