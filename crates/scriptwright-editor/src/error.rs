//! Error types for tree editing and editing sessions.

use scriptwright_core::ActionPath;
use scriptwright_schema::{FieldValueError, SchemaError};
use scriptwright_store::PersistError;
use thiserror::Error;

/// Errors from structural operations on an action tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// No node exists at the path.
    #[error("no action at path '{0}'")]
    InvalidPath(ActionPath),

    /// The verb is not allowed at the requested level.
    #[error("verb '{verb}' is not allowed {}", level_name(.parent))]
    UnknownVerb {
        verb: String,
        parent: Option<String>,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn level_name(parent: &Option<String>) -> String {
    match parent {
        Some(verb) => format!("under '{}'", verb),
        None => "at the script root".to_string(),
    }
}

/// Errors from the undo buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    Empty,
}

/// Errors surfaced by an [`EditingSession`](crate::EditingSession).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Field(#[from] FieldValueError),

    /// The script failed a pre-save check.
    #[error("validation failed: {0}")]
    Validation(String),
}
