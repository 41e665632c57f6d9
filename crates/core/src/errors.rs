//! Core error types for the paper-trading ledger.
//!
//! This module defines store-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::fmt;

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger.
///
/// Business-rule failures (`InsufficientFunds`, `InsufficientHolding`) are
/// surfaced to callers verbatim. Store failures are wrapped in
/// [`DatabaseError`] together with the operation and key that failed.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Insufficient holding: {0}")]
    InsufficientHolding(String),

    #[error("Transaction conflict on {0}, retry the request")]
    TransactionConflict(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Failed to ensure user account: {0}")]
    Provisioning(String),
}

/// Store-agnostic error type for document store operations.
///
/// This enum uses `String` for all error details, allowing store
/// implementations to convert their native errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested document was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A create-if-absent hit an existing document.
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A conditional write observed a different document version.
    #[error("Concurrent write detected: {0}")]
    WriteConflict(String),

    /// A batch write exceeded the store's batch size limit.
    #[error("Batch of {size} writes exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    /// A stored document could not be (de)serialized.
    #[error("Malformed document {path}: {reason}")]
    Malformed { path: String, reason: String },

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),

    /// A store call failed while running `operation` on `key`.
    #[error("{operation} {key}: {source}")]
    Context {
        operation: String,
        key: String,
        source: Box<DatabaseError>,
    },
}

impl DatabaseError {
    /// The store error underneath any operation context.
    pub fn root(&self) -> &DatabaseError {
        match self {
            DatabaseError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// `map_err` adapter that tags a store failure with the operation and key
/// it happened on. Non-store errors are returned unchanged.
pub fn store_context<K: fmt::Display>(
    operation: &'static str,
    key: K,
) -> impl FnOnce(Error) -> Error {
    move |err| match err {
        Error::Database(source) => Error::Database(DatabaseError::Context {
            operation: operation.to_string(),
            key: key.to_string(),
            source: Box::new(source),
        }),
        other => other,
    }
}

/// Validation errors for caller input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

// === From implementations for common error types ===

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}
