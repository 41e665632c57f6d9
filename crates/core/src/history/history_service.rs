use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};

use super::history_model::{Order, ValuationHistory};
use super::history_traits::HistoryServiceTrait;
use crate::accounts::User;
use crate::constants::{
    ORDERS_COLLECTION, USERS_COLLECTION, VALUATIONS_COLLECTION, VALUATION_DATE_FIELD,
};
use crate::errors::{store_context, DatabaseError, Error, Result};
use crate::money::Money;
use crate::store::{encode, CollectionPath, DocumentPath, DocumentStore, Filter};
use crate::utils::time_utils::{order_key, truncate_to_second, valuation_key};

/// Order log and valuation series, stored as sub-collections of the user.
pub struct HistoryService {
    store: Arc<dyn DocumentStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    fn user_collection(user_id: &str, name: &str) -> CollectionPath {
        CollectionPath::root(USERS_COLLECTION)
            .doc(user_id)
            .sub_collection(name)
    }

    fn orders(user_id: &str) -> CollectionPath {
        Self::user_collection(user_id, ORDERS_COLLECTION)
    }

    fn valuations(user_id: &str) -> CollectionPath {
        Self::user_collection(user_id, VALUATIONS_COLLECTION)
    }
}

#[async_trait]
impl HistoryServiceTrait for HistoryService {
    async fn append_order(&self, user_id: &str, order: &Order) -> Result<()> {
        let path = Self::orders(user_id).doc(order_key(order.date));
        let data = encode(&path, order)?;
        match self.store.create(&path, data).await {
            Ok(()) => Ok(()),
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                Err(Error::DuplicateKey(path.to_string()))
            }
            Err(e) => Err(store_context("append order", &path)(e)),
        }
    }

    async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>> {
        let orders = Self::orders(user_id);
        self.store
            .query(&orders, None)
            .await
            .map_err(store_context("list orders", &orders))?
            .iter()
            .map(|doc| doc.decode())
            .collect()
    }

    async fn list_valuation_history(&self, user_id: &str) -> Result<Vec<ValuationHistory>> {
        let valuations = Self::valuations(user_id);
        self.store
            .query(&valuations, None)
            .await
            .map_err(store_context("list valuations", &valuations))?
            .iter()
            .map(|doc| doc.decode())
            .collect()
    }

    async fn record_valuation(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
        value: Money,
    ) -> Result<ValuationHistory> {
        let entry = ValuationHistory {
            date: truncate_to_second(at),
            value,
        };
        let path = Self::valuations(user_id).doc(valuation_key(at));
        let data = encode(&path, &entry)?;
        match self.store.create(&path, data).await {
            Ok(()) => Ok(entry),
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => {
                debug!("Valuation {} already recorded", path);
                let stored = self
                    .store
                    .get(&path)
                    .await
                    .map_err(store_context("read valuation", &path))?;
                match stored {
                    Some(existing) => existing.decode(),
                    None => Ok(entry),
                }
            }
            Err(e) => Err(store_context("record valuation", &path)(e)),
        }
    }

    async fn rotate_valuation_history(
        &self,
        user_id: &str,
        delete_before: DateTime<Utc>,
    ) -> Result<usize> {
        let filter = Filter::before(VALUATION_DATE_FIELD, delete_before);
        let valuations = Self::valuations(user_id);
        let expired: Vec<DocumentPath> = self
            .store
            .query(&valuations, Some(&filter))
            .await
            .map_err(store_context("scan expired valuations", &valuations))?
            .into_iter()
            .map(|doc| doc.path)
            .collect();

        if expired.is_empty() {
            return Ok(0);
        }

        let batch_size = self.store.max_batch_size().max(1);
        for chunk in expired.chunks(batch_size) {
            self.store
                .delete_batch(chunk)
                .await
                .map_err(store_context("delete expired valuations", &valuations))?;
        }
        info!(
            "Rotated {} valuation(s) of {} older than {}",
            expired.len(),
            user_id,
            delete_before
        );
        Ok(expired.len())
    }

    async fn record_portfolio_snapshot(
        &self,
        user: &User,
        quotes: &HashMap<String, Money>,
        at: DateTime<Utc>,
    ) -> Result<ValuationHistory> {
        let value = user.portfolio.valuation(quotes)?;
        self.record_valuation(&user.id, at, value).await
    }
}
