//! Editing session configuration.

use serde::{Deserialize, Serialize};

/// Largest accepted `history_capacity`.
pub const MAX_HISTORY_CAPACITY: usize = 1000;

/// Configuration for editing sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots kept per session.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
        }
    }
}

fn default_history_capacity() -> usize {
    10
}
