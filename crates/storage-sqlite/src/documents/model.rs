//! Database models for documents.

use diesel::prelude::*;
use papertrade_core::errors::{DatabaseError, Error, Result};
use papertrade_core::store::{CollectionPath, Document, DocumentPath};
use serde_json::Value;

/// One stored document; `data` holds its JSON text.
#[derive(Queryable, Selectable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentDB {
    pub collection: String,
    pub doc_id: String,
    pub data: String,
    pub version: i64,
}

impl DocumentDB {
    pub fn new(path: &DocumentPath, data: &Value, version: u64) -> Result<Self> {
        Ok(Self {
            collection: path.collection().as_str().to_string(),
            doc_id: path.id().to_string(),
            data: data.to_string(),
            version: to_db_version(version)?,
        })
    }

    pub fn path(&self) -> DocumentPath {
        CollectionPath::from_raw(self.collection.clone()).doc(self.doc_id.clone())
    }
}

impl TryFrom<DocumentDB> for Document {
    type Error = Error;

    fn try_from(db: DocumentDB) -> Result<Self> {
        let path = db.path();
        let data = serde_json::from_str(&db.data).map_err(|e| {
            Error::Database(DatabaseError::Malformed {
                path: path.to_string(),
                reason: e.to_string(),
            })
        })?;
        let version = u64::try_from(db.version).map_err(|_| {
            Error::Database(DatabaseError::Malformed {
                path: path.to_string(),
                reason: format!("negative version {}", db.version),
            })
        })?;
        Ok(Document {
            path,
            data,
            version,
        })
    }
}

pub(crate) fn to_db_version(version: u64) -> Result<i64> {
    i64::try_from(version).map_err(|_| {
        Error::Database(DatabaseError::Internal(format!(
            "version {version} does not fit in the documents table"
        )))
    })
}
