//! Error types for the SQLite access layer.
//!
//! Provides a unified error type covering identifier validation, database
//! access, request-shape problems, and migration failures. Every validation
//! variant aborts its operation before any storage access happens.

use thiserror::Error;

/// Errors that can occur during access-layer operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier or statement-kind validation failure from the safety guard.
    #[error(transparent)]
    Guard(#[from] atelier_core::GuardError),

    /// SQLite operation failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filter is structurally invalid (e.g. an empty `IN` list, a negative
    /// limit or offset).
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// Update payload contains no updatable fields.
    #[error("update on {0} requires at least one field")]
    EmptyUpdate(String),

    /// Junction table does not have exactly two columns.
    #[error("{0} is not a valid junction table")]
    NotAJunctionTable(String),

    /// Lookup column is not one of the junction's two columns.
    #[error("{column} is not a column of {junction}")]
    ColumnNotInJunction {
        /// The column named in the request.
        column: String,
        /// The junction table it was checked against.
        junction: String,
    },

    /// Request payload has the wrong shape (non-object data, empty id,
    /// non-array table dump, unbindable value).
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Schema lifecycle operation failure.
    #[error("migration error: {0}")]
    MigrationError(String),
}

/// Convenience alias for results with [`StoreError`].
pub type Result<T> = std::result::Result<T, StoreError>;
