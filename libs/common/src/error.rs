//! Database error types shared by the auth and api services

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Errors from the shared database layer
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// The pool could not be built or a connection could not be acquired
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// A query against an established connection failed
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Invalid connection configuration, e.g. a malformed `DATABASE_URL`
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
