use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use log::debug;
use serde_json::Value;

use papertrade_core::constants::DEFAULT_MAX_BATCH_SIZE;
use papertrade_core::errors::{DatabaseError, Error, Result};
use papertrade_core::store::{CollectionPath, Document, DocumentPath, DocumentStore, Filter};

use super::model::{to_db_version, DocumentDB};
use crate::db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbPool, WriteHandle,
};
use crate::errors::{IntoCore, StorageError};
use crate::schema::documents;

/// Document store backed by a single SQLite table.
///
/// Reads go through the pool; every write is a job on the single writer
/// actor, so conditional writes and batch deletes are serialized and run in
/// an immediate transaction.
pub struct SqliteDocumentStore {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    max_batch_size: usize,
}

impl SqliteDocumentStore {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SqliteDocumentStore {
            pool,
            writer,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    /// Opens (creating if needed) the database at `db_path`, applies pending
    /// migrations and starts the writer. Must be called inside a Tokio runtime.
    pub fn open(db_path: &str) -> Result<Self> {
        init(db_path)?;
        let pool = create_pool(db_path)?;
        run_migrations(&pool)?;
        let writer = spawn_writer(&pool)?;
        Ok(Self::new(pool, writer))
    }
}

fn current_version(
    conn: &mut SqliteConnection,
    collection: &str,
    id: &str,
) -> Result<Option<i64>> {
    documents::table
        .find((collection, id))
        .select(documents::version)
        .first::<i64>(conn)
        .optional()
        .into_core()
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn create(&self, path: &DocumentPath, data: Value) -> Result<()> {
        let row = DocumentDB::new(path, &data, 1)?;
        let key = path.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::insert_into(documents::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(|e| match e {
                        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                            Error::Database(DatabaseError::UniqueViolation(key))
                        }
                        other => StorageError::from(other).into(),
                    })?;
                Ok(())
            })
            .await
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        let mut conn = get_connection(&self.pool)?;
        let row = documents::table
            .find((path.collection().as_str(), path.id()))
            .select(DocumentDB::as_select())
            .first::<DocumentDB>(&mut conn)
            .optional()
            .into_core()?;
        row.map(Document::try_from).transpose()
    }

    async fn set(&self, path: &DocumentPath, data: Value) -> Result<()> {
        let row = DocumentDB::new(path, &data, 1)?;
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                match current_version(conn, &row.collection, &row.doc_id)? {
                    Some(version) => {
                        diesel::update(
                            documents::table.find((row.collection.as_str(), row.doc_id.as_str())),
                        )
                        .set((
                            documents::data.eq(row.data.as_str()),
                            documents::version.eq(version + 1),
                        ))
                        .execute(conn)
                        .into_core()?;
                    }
                    None => {
                        diesel::insert_into(documents::table)
                            .values(&row)
                            .execute(conn)
                            .into_core()?;
                    }
                }
                Ok(())
            })
            .await
    }

    async fn update_if_version(
        &self,
        path: &DocumentPath,
        expected_version: u64,
        data: Value,
    ) -> Result<()> {
        let expected = to_db_version(expected_version)?;
        let collection = path.collection().as_str().to_string();
        let id = path.id().to_string();
        let payload = data.to_string();
        let key = path.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let updated = diesel::update(
                    documents::table
                        .find((collection.as_str(), id.as_str()))
                        .filter(documents::version.eq(expected)),
                )
                .set((
                    documents::data.eq(payload.as_str()),
                    documents::version.eq(expected + 1),
                ))
                .execute(conn)
                .into_core()?;

                if updated == 0 {
                    return Err(Error::Database(DatabaseError::WriteConflict(format!(
                        "{key} is no longer at version {expected}"
                    ))));
                }
                Ok(())
            })
            .await
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<&Filter>,
    ) -> Result<Vec<Document>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .select(DocumentDB::as_select())
            .load::<DocumentDB>(&mut conn)
            .into_core()?;

        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            let doc = Document::try_from(row)?;
            if filter.map_or(true, |f| f.matches(&doc.data)) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    async fn delete_batch(&self, paths: &[DocumentPath]) -> Result<()> {
        if paths.len() > self.max_batch_size {
            return Err(Error::Database(DatabaseError::BatchTooLarge {
                size: paths.len(),
                limit: self.max_batch_size,
            }));
        }
        if paths.is_empty() {
            return Ok(());
        }

        let keys: Vec<(String, String)> = paths
            .iter()
            .map(|p| (p.collection().as_str().to_string(), p.id().to_string()))
            .collect();
        let deleted = self
            .writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut deleted = 0;
                for (collection, id) in &keys {
                    deleted += diesel::delete(
                        documents::table.find((collection.as_str(), id.as_str())),
                    )
                    .execute(conn)
                    .into_core()?;
                }
                Ok(deleted)
            })
            .await?;
        debug!("Deleted {} of {} requested documents", deleted, paths.len());
        Ok(())
    }

    fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }
}
