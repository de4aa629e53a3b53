//! Error types for script persistence.

use thiserror::Error;

/// Errors returned by a [`ScriptStore`](crate::ScriptStore) or
/// [`DesignStore`](crate::DesignStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    /// The document could not be read.
    #[error("failed to load '{id}': {reason}")]
    LoadFailed { id: String, reason: String },

    /// The document could not be written.
    #[error("failed to save: {0}")]
    SaveFailed(String),

    /// The document could not be removed.
    #[error("failed to delete: {0}")]
    DeleteFailed(String),
}

impl PersistError {
    pub(crate) fn load(id: &str, reason: impl ToString) -> Self {
        PersistError::LoadFailed {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}
