//! Store module - the document store contract, the optimistic transaction
//! primitive and an in-memory implementation.

mod memory_store;
mod store_model;
mod store_traits;
mod transaction;

#[cfg(test)]
pub(crate) mod test_utils;

pub use memory_store::InMemoryDocumentStore;
pub use store_model::{encode, CollectionPath, Document, DocumentPath, Filter};
pub use store_traits::DocumentStore;
pub use transaction::{run_transaction, TransactionOptions};
