//! Error types for schema loading and resolution.

use thiserror::Error;

/// Errors that can occur while loading or querying the action schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A query was issued before `configure()` succeeded.
    #[error("the schema resolver is not configured; call configure() first")]
    NotConfigured,

    /// The document does not describe an `actions` array of alternatives.
    #[error("invalid schema shape: {0}")]
    InvalidShape(String),

    /// An action or sub-action alternative is malformed.
    #[error("invalid action schema: {0}")]
    InvalidAction(String),

    /// The document is not valid JSON.
    #[error("failed to parse schema document: {0}")]
    ParseFailure(String),

    /// The document could not be retrieved.
    #[error("failed to fetch schema document: {0}")]
    FetchFailure(String),
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::ParseFailure(err.to_string())
    }
}

impl From<reqwest::Error> for SchemaError {
    fn from(err: reqwest::Error) -> Self {
        SchemaError::FetchFailure(err.to_string())
    }
}
