//! Document store contract.
//!
//! The ledger only talks to persistence through this trait, so the SQLite
//! implementation in `storage-sqlite` and the in-memory one used by tests and
//! the `memory` server mode are interchangeable.

use async_trait::async_trait;
use serde_json::Value;

use super::store_model::{CollectionPath, Document, DocumentPath, Filter};
use crate::errors::Result;

/// Trait defining the contract for document store operations.
///
/// Errors are reported as [`crate::errors::DatabaseError`] wrapped in
/// [`crate::errors::Error::Database`]; callers translate the
/// `UniqueViolation` and `WriteConflict` cases into domain errors.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Creates a document if no document exists at `path`.
    ///
    /// Fails with `DatabaseError::UniqueViolation` otherwise.
    async fn create(&self, path: &DocumentPath, data: Value) -> Result<()>;

    /// Reads a document, `None` when absent.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>>;

    /// Overwrites (or creates) the whole document.
    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()>;

    /// Overwrites the document only if it is still at `expected_version`.
    ///
    /// Fails with `DatabaseError::WriteConflict` when the version moved or
    /// the document disappeared. This single call is the commit point of a
    /// transaction.
    async fn update_if_version(
        &self,
        path: &DocumentPath,
        expected_version: u64,
        data: Value,
    ) -> Result<()>;

    /// Unordered scan of a collection.
    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>>;

    /// Deletes all `paths` atomically.
    ///
    /// Fails with `DatabaseError::BatchTooLarge` when more than
    /// [`DocumentStore::max_batch_size`] paths are given.
    async fn delete_batch(&self, paths: &[DocumentPath]) -> Result<()>;

    /// Largest number of documents a single batched write may touch.
    fn max_batch_size(&self) -> usize;
}
