//! In-memory document store.
//!
//! Backs the test suites and the server's `memory` mode. Every operation
//! takes the lock once, so each call is atomic with respect to the others.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::store_model::{CollectionPath, Document, DocumentPath, Filter};
use super::store_traits::DocumentStore;
use crate::constants::DEFAULT_MAX_BATCH_SIZE;
use crate::errors::{DatabaseError, Error, Result};

#[derive(Debug, Clone)]
struct StoredDoc {
    data: Value,
    version: u64,
}

type Collections = BTreeMap<CollectionPath, BTreeMap<String, StoredDoc>>;

pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
    max_batch_size: usize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_max_batch_size(DEFAULT_MAX_BATCH_SIZE)
    }

    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            collections: RwLock::new(BTreeMap::new()),
            max_batch_size,
        }
    }

    /// Number of documents directly inside `collection`.
    pub fn document_count(&self, collection: &CollectionPath) -> usize {
        self.collections
            .read()
            .map(|c| c.get(collection).map_or(0, BTreeMap::len))
            .unwrap_or(0)
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Collections>> {
        self.collections
            .read()
            .map_err(|_| Error::Database(DatabaseError::Internal("store lock poisoned".into())))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Collections>> {
        self.collections
            .write()
            .map_err(|_| Error::Database(DatabaseError::Internal("store lock poisoned".into())))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, path: &DocumentPath, data: Value) -> Result<()> {
        let mut collections = self.write()?;
        let docs = collections.entry(path.collection().clone()).or_default();
        if docs.contains_key(path.id()) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                path.to_string(),
            )));
        }
        docs.insert(path.id().to_string(), StoredDoc { data, version: 1 });
        Ok(())
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let collections = self.read()?;
        Ok(collections
            .get(path.collection())
            .and_then(|docs| docs.get(path.id()))
            .map(|stored| Document {
                path: path.clone(),
                data: stored.data.clone(),
                version: stored.version,
            }))
    }

    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()> {
        let mut collections = self.write()?;
        let docs = collections.entry(path.collection().clone()).or_default();
        let version = docs.get(path.id()).map_or(1, |d| d.version + 1);
        docs.insert(path.id().to_string(), StoredDoc { data, version });
        Ok(())
    }

    async fn update_if_version(
        &self,
        path: &DocumentPath,
        expected_version: u64,
        data: Value,
    ) -> Result<()> {
        let mut collections = self.write()?;
        let stored = collections
            .get_mut(path.collection())
            .and_then(|docs| docs.get_mut(path.id()));
        match stored {
            Some(doc) if doc.version == expected_version => {
                doc.data = data;
                doc.version += 1;
                Ok(())
            }
            Some(doc) => Err(Error::Database(DatabaseError::WriteConflict(format!(
                "{} is at version {}, expected {}",
                path, doc.version, expected_version
            )))),
            None => Err(Error::Database(DatabaseError::WriteConflict(format!(
                "{path} no longer exists"
            )))),
        }
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>> {
        let collections = self.read()?;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(docs
            .iter()
            .filter(|(_, stored)| filter.map_or(true, |f| f.matches(&stored.data)))
            .map(|(id, stored)| Document {
                path: collection.doc(id.clone()),
                data: stored.data.clone(),
                version: stored.version,
            })
            .collect())
    }

    async fn delete_batch(&self, paths: &[DocumentPath]) -> Result<()> {
        if paths.len() > self.max_batch_size {
            return Err(Error::Database(DatabaseError::BatchTooLarge {
                size: paths.len(),
                limit: self.max_batch_size,
            }));
        }
        let mut collections = self.write()?;
        for path in paths {
            if let Some(docs) = collections.get_mut(path.collection()) {
                docs.remove(path.id());
            }
        }
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}
