//! Store wrapper for exercising races and partial failures in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Barrier;

use super::memory_store::InMemoryDocumentStore;
use super::store_model::{CollectionPath, Document, DocumentPath, Filter};
use super::store_traits::DocumentStore;
use crate::constants::DEFAULT_MAX_BATCH_SIZE;
use crate::errors::{DatabaseError, Error, Result};

/// Holds the first `parties` callers of an operation until all of them
/// arrived, then lets everyone through.
struct Gate {
    barrier: Barrier,
    remaining: AtomicUsize,
}

impl Gate {
    fn new(parties: usize) -> Self {
        Self {
            barrier: Barrier::new(parties),
            remaining: AtomicUsize::new(parties),
        }
    }

    async fn pass(&self) {
        let claimed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if claimed {
            self.barrier.wait().await;
        }
    }
}

pub(crate) struct ScriptedStore {
    pub inner: Arc<InMemoryDocumentStore>,
    create_gate: Option<Gate>,
    commit_gate: Option<Gate>,
    failing_creates: Option<String>,
    pub delete_batches: AtomicUsize,
}

impl ScriptedStore {
    pub fn new(inner: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            inner,
            create_gate: None,
            commit_gate: None,
            failing_creates: None,
            delete_batches: AtomicUsize::new(0),
        }
    }

    /// First `parties` creates wait for each other before writing.
    pub fn gate_creates(mut self, parties: usize) -> Self {
        self.create_gate = Some(Gate::new(parties));
        self
    }

    /// First `parties` conditional writes wait for each other before committing.
    pub fn gate_commits(mut self, parties: usize) -> Self {
        self.commit_gate = Some(Gate::new(parties));
        self
    }

    /// Creates in collections whose path ends with `suffix` fail.
    pub fn fail_creates_in(mut self, suffix: &str) -> Self {
        self.failing_creates = Some(suffix.to_string());
        self
    }
}

#[async_trait]
impl DocumentStore for ScriptedStore {
    async fn create(&self, path: &DocumentPath, data: Value) -> Result<()> {
        if let Some(suffix) = &self.failing_creates {
            if path.collection().as_str().ends_with(suffix.as_str()) {
                return Err(Error::Database(DatabaseError::ConnectionFailed(
                    "connection reset".to_string(),
                )));
            }
        }
        if let Some(gate) = &self.create_gate {
            gate.pass().await;
        }
        self.inner.create(path, data).await
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()> {
        self.inner.set(path, data).await
    }

    async fn update_if_version(
        &self,
        path: &DocumentPath,
        expected_version: u64,
        data: Value,
    ) -> Result<()> {
        if let Some(gate) = &self.commit_gate {
            gate.pass().await;
        }
        self.inner
            .update_if_version(path, expected_version, data)
            .await
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>> {
        self.inner.query(collection, filter).await
    }

    async fn delete_batch(&self, paths: &[DocumentPath]) -> Result<()> {
        self.delete_batches.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_batch(paths).await
    }

    fn max_batch_size(&self) -> usize {
        self.inner.max_batch_size()
    }
}

/// Store whose every call fails with a disk error.
pub(crate) struct BrokenStore;

fn disk_error() -> Error {
    Error::Database(DatabaseError::QueryFailed("disk I/O error".to_string()))
}

#[async_trait]
impl DocumentStore for BrokenStore {
    async fn create(&self, _path: &DocumentPath, _data: Value) -> Result<()> {
        Err(disk_error())
    }

    async fn get(&self, _path: &DocumentPath) -> Result<Option<Document>> {
        Err(disk_error())
    }

    async fn set(&self, _path: &DocumentPath, _data: Value) -> Result<()> {
        Err(disk_error())
    }

    async fn update_if_version(
        &self,
        _path: &DocumentPath,
        _expected_version: u64,
        _data: Value,
    ) -> Result<()> {
        Err(disk_error())
    }

    async fn query(
        &self,
        _collection: &CollectionPath,
        _filter: Option<&Filter>,
    ) -> Result<Vec<Document>> {
        Err(disk_error())
    }

    async fn delete_batch(&self, _paths: &[DocumentPath]) -> Result<()> {
        Err(disk_error())
    }

    fn max_batch_size(&self) -> usize {
        DEFAULT_MAX_BATCH_SIZE
    }
}
