use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::history_model::{Order, ValuationHistory};
use crate::accounts::User;
use crate::errors::Result;
use crate::money::Money;

/// Trait defining the contract for order and valuation history.
#[async_trait]
pub trait HistoryServiceTrait: Send + Sync {
    /// Appends an order keyed by its nanosecond timestamp.
    ///
    /// Never overwrites: an existing key is `Error::DuplicateKey`.
    async fn append_order(&self, user_id: &str, order: &Order) -> Result<()>;

    /// All orders of a user, unordered.
    async fn list_orders(&self, user_id: &str) -> Result<Vec<Order>>;

    /// All valuation entries of a user, unordered.
    async fn list_valuation_history(&self, user_id: &str) -> Result<Vec<ValuationHistory>>;

    /// Records the value at `at`, truncated to the second.
    ///
    /// A second call for the same second is a no-op; the first value wins.
    async fn record_valuation(
        &self,
        user_id: &str,
        at: DateTime<Utc>,
        value: Money,
    ) -> Result<ValuationHistory>;

    /// Deletes every valuation strictly older than `delete_before` and
    /// returns how many were removed.
    async fn rotate_valuation_history(
        &self,
        user_id: &str,
        delete_before: DateTime<Utc>,
    ) -> Result<usize>;

    /// Values `user`'s portfolio against `quotes` and records the result.
    async fn record_portfolio_snapshot(
        &self,
        user: &User,
        quotes: &HashMap<String, Money>,
        at: DateTime<Utc>,
    ) -> Result<ValuationHistory>;
}
