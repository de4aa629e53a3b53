//! Script storage configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the script store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage backend type.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding one JSON document per script (file backend).
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Directory holding one JSON document per site design (file backend).
    #[serde(default = "default_designs_directory")]
    pub designs_directory: PathBuf,
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Keep scripts in process memory. Nothing outlives the process.
    Memory,
    /// Persist scripts as JSON files.
    #[default]
    File,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            directory: default_directory(),
            designs_directory: default_designs_directory(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("scripts")
}

fn default_designs_directory() -> PathBuf {
    PathBuf::from("designs")
}
