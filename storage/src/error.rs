//! Storage error types.
//!
//! Used by the ledger components and callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate message: {0}")]
    DuplicateMessage(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// True when the error is a uniqueness-constraint violation.
///
/// Used to turn a duplicate message insert into [`StorageError::DuplicateMessage`]
/// and to resolve concurrent first-inserts of the same user as an update.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.kind() == sqlx::error::ErrorKind::UniqueViolation,
        _ => false,
    }
}
