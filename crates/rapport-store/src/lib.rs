//! Rapport Storage Layer
//!
//! Implements the `IdentityDirectory` and `ContentStore` traits from
//! `rapport-domain`.
//!
//! # Architecture
//!
//! - [`SqliteStore`]: durable storage. Follow edges, profile views and reactions
//!   live in relation tables; multi-account writes run in one transaction.
//! - [`MemoryStore`]: document-style in-process storage, used by tests and by
//!   callers that do not need durability.
//!
//! # Examples
//!
//! ```no_run
//! use rapport_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for account and content operations
//! ```

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use rapport_domain::traits::RetryableError;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Account or content item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Entity with the same id already exists
    #[error("Duplicate entity: {0}")]
    Duplicate(String),
}

impl RetryableError for StoreError {
    fn is_retryable(&self) -> bool {
        match self {
            StoreError::Database(e) => matches!(
                e.sqlite_error_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    #[test]
    fn test_only_lock_contention_is_retryable() {
        let busy = StoreError::Database(rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_BUSY),
            None,
        ));
        let constraint = StoreError::Database(rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_CONSTRAINT),
            Some("FOREIGN KEY constraint failed".to_string()),
        ));

        assert!(busy.is_retryable());
        assert!(!constraint.is_retryable());
        assert!(!StoreError::NotFound("account 1".to_string()).is_retryable());
    }
}
