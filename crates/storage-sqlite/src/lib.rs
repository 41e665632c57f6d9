//! SQLite storage implementation for the paper-trading ledger.
//!
//! This crate provides the database-related functionality using Diesel ORM with SQLite.
//! It implements the `DocumentStore` contract defined in `papertrade-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The single-writer actor that serializes writes
//! - The `documents` table model and store implementation
//!
//! # Architecture
//!
//! This crate is the only place in the workspace where Diesel dependencies exist.
//! The core crate is store-agnostic and works with the trait.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod documents;
pub mod errors;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use documents::SqliteDocumentStore;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from papertrade-core for convenience
pub use papertrade_core::errors::{DatabaseError, Error, Result};
