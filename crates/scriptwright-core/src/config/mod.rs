//! Configuration types for Scriptwright.
//!
//! Configuration is loaded from a single YAML file (by convention
//! `scriptwright.yaml` in the working directory). Every section is optional;
//! missing values fall back to the defaults documented on each field.
//!
//! # Example
//!
//! ```yaml
//! schema:
//!   source: /sites/design/SiteAssets/schema.json
//!   base_url: https://contoso.example.com
//! storage:
//!   backend: file
//!   directory: ./scripts
//!   designs_directory: ./designs
//! editor:
//!   history_capacity: 10
//! observability:
//!   log_level: debug
//! ```

pub mod editor;
pub mod observability;
pub mod schema;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use editor::{EditorConfig, MAX_HISTORY_CAPACITY};
pub use observability::ObservabilityConfig;
pub use schema::SchemaConfig;
pub use storage::{StorageBackend, StorageConfig};

/// Complete Scriptwright configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptwrightConfig {
    /// Where the action schema comes from.
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Script persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Editing session behavior.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Logging.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScriptwrightConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise return the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values serde cannot constrain on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.editor.history_capacity == 0 {
            return Err(ConfigError::Config(
                "editor.history_capacity must be at least 1".to_string(),
            ));
        }

        if self.editor.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(ConfigError::Config(format!(
                "editor.history_capacity must be at most {}",
                MAX_HISTORY_CAPACITY
            )));
        }

        if self.storage.backend == StorageBackend::File
            && self.storage.directory.as_os_str().is_empty()
        {
            return Err(ConfigError::Config(
                "storage.directory is required for the file backend".to_string(),
            ));
        }

        if self.storage.backend == StorageBackend::File
            && self.storage.designs_directory.as_os_str().is_empty()
        {
            return Err(ConfigError::Config(
                "storage.designs_directory is required for the file backend".to_string(),
            ));
        }

        if let Some(base_url) = &self.schema.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Config(format!(
                    "schema.base_url '{}' must be an http(s) URL",
                    base_url
                )));
            }
        }

        Ok(())
    }
}
