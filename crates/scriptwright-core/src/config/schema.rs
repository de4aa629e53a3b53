//! Schema source configuration.

use serde::{Deserialize, Serialize};

/// Where the action schema document is loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Locator or inline JSON.
    ///
    /// Absent or empty selects the embedded default schema. A value starting
    /// with `/`, `http://` or `https://` is fetched over HTTP. Anything else is
    /// parsed as a JSON document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Base URL that `/`-relative locators are joined onto.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// HTTP timeout for schema fetches, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            source: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
