//! Error types for relationship and engagement operations

use thiserror::Error;

/// Hard failures of a graph or ledger operation
///
/// "Already done" conditions are not errors; they come back as
/// [`rapport_domain::Outcome`] variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// Referenced account or content item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Semantically disallowed request (self-follow, self-view)
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The store could not durably commit the change
    #[error("Storage failure: {0}")]
    StorageFailure(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GraphError {
    /// Short machine-readable tag
    pub fn tag(&self) -> &'static str {
        match self {
            GraphError::NotFound(_) => "not_found",
            GraphError::InvalidOperation(_) => "invalid_operation",
            GraphError::StorageFailure(_) => "storage_failure",
            GraphError::Config(_) => "config",
        }
    }
}
