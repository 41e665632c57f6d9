//! Paths, documents and filters understood by every document store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{DatabaseError, Error, Result};

/// Slash-separated path of a collection, e.g. `users` or `users/github_1/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    /// A top-level collection.
    pub fn root(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Rebuilds a path previously produced by [`CollectionPath::as_str`].
    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single document: its collection plus its id inside that collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl DocumentPath {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// A collection owned by this document.
    pub fn sub_collection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}/{}", self.collection, self.id, name))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// A stored document with the version it was read at.
///
/// Versions start at 1 and increase on every write; conditional writes
/// compare against them.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub path: DocumentPath,
    pub data: Value,
    pub version: u64,
}

impl Document {
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            Error::Database(DatabaseError::Malformed {
                path: self.path.to_string(),
                reason: e.to_string(),
            })
        })
    }
}

/// Serializes a value into document data.
pub fn encode<T: Serialize>(path: &DocumentPath, value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| {
        Error::Database(DatabaseError::Malformed {
            path: path.to_string(),
            reason: e.to_string(),
        })
    })
}

/// Scan predicate. Stores give no ordering or index guarantees beyond these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// Timestamp field strictly before the given instant.
    Before { field: String, value: DateTime<Utc> },
}

impl Filter {
    pub fn before(field: &str, value: DateTime<Utc>) -> Self {
        Filter::Before {
            field: field.to_string(),
            value,
        }
    }

    /// Evaluates the predicate against document data.
    ///
    /// A missing or unparseable field never matches.
    pub fn matches(&self, data: &Value) -> bool {
        match self {
            Filter::Before { field, value } => data
                .get(field)
                .and_then(Value::as_str)
                .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                .map(|ts| ts.with_timezone(&Utc) < *value)
                .unwrap_or(false),
        }
    }
}
