//! Optimistic read-modify-write over a single document.

use std::num::NonZeroU32;

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::store_model::{encode, DocumentPath};
use super::store_traits::DocumentStore;
use crate::errors::{store_context, DatabaseError, Error, Result};

/// Attempt budget for [`run_transaction`].
///
/// There is deliberately no `Default`: every call site states how many
/// commits it is willing to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionOptions {
    max_attempts: NonZeroU32,
}

impl TransactionOptions {
    /// One commit attempt; a conflicting write fails the transaction.
    pub const fn single_attempt() -> Self {
        Self {
            max_attempts: NonZeroU32::MIN,
        }
    }

    pub const fn with_max_attempts(max_attempts: NonZeroU32) -> Self {
        Self { max_attempts }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.get()
    }
}

/// Reads the document at `path`, hands it to `body`, and writes back the
/// document `body` returns, conditioned on the version that was read.
///
/// - `body` errors abort the transaction with nothing written.
/// - A missing document is `Error::NotFound`.
/// - When the conditional write conflicts and the attempt budget is spent,
///   the result is `Error::TransactionConflict`.
///
/// `body` may run more than once when the budget allows retries, so it must
/// be free of side effects.
pub async fn run_transaction<S, D, T, F>(
    store: &S,
    path: &DocumentPath,
    options: TransactionOptions,
    mut body: F,
) -> Result<T>
where
    S: DocumentStore + ?Sized,
    D: Serialize + DeserializeOwned + Send,
    T: Send,
    F: FnMut(D) -> Result<(D, T)> + Send,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        let doc = store
            .get(path)
            .await
            .map_err(store_context("transaction read", path))?
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        let current: D = doc.decode()?;
        let (updated, output) = body(current)?;
        let data = encode(path, &updated)?;

        match store.update_if_version(path, doc.version, data).await {
            Ok(()) => return Ok(output),
            Err(Error::Database(DatabaseError::WriteConflict(reason))) => {
                if attempt >= options.max_attempts() {
                    debug!(
                        "Transaction on {} gave up after {} attempt(s): {}",
                        path, attempt, reason
                    );
                    return Err(Error::TransactionConflict(path.to_string()));
                }
                debug!("Transaction on {} conflicted, attempt {}", path, attempt);
            }
            Err(e) => return Err(store_context("transaction write", path)(e)),
        }
    }
}
