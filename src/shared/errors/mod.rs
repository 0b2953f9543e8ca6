//! Error Types
//!
//! Driver-level failures and the errors that cross the pool's API boundary.

use thiserror::Error;

/// Errors reported by a database driver or one of its connections
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Connection attempt failed: {0}")]
    Connect(String),

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Unable to read connection status: {0}")]
    Status(String),

    #[error("Transaction control failed: {0}")]
    Transaction(String),

    #[error("Connection is closed")]
    Closed,

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Errors surfaced to callers of the connection pool
///
/// Commit and validity-check failures never appear here: the pool absorbs
/// them by discarding the connection.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The configured driver could not be resolved. The pool cannot be built.
    #[error("Unable to register driver '{driver}': {reason}")]
    DriverRegistration { driver: String, reason: String },

    /// The driver refused to open a new connection.
    #[error("Unable to create connection: {0}")]
    ConnectionCreation(#[source] DriverError),
}

impl PoolError {
    /// Whether the pool that produced this error is still usable
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DriverRegistration { .. })
    }
}
