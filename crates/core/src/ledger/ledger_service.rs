use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::ledger_traits::LedgerServiceTrait;
use crate::accounts::User;
use crate::constants::USERS_COLLECTION;
use crate::errors::Result;
use crate::history::{HistoryServiceTrait, Order};
use crate::money::Money;
use crate::portfolio::TradeAction;
use crate::store::{run_transaction, CollectionPath, DocumentStore, TransactionOptions};
use crate::utils::Clock;

/// Applies trades to user portfolios under an optimistic transaction.
pub struct LedgerService {
    store: Arc<dyn DocumentStore>,
    history: Arc<dyn HistoryServiceTrait>,
    clock: Arc<dyn Clock>,
}

impl LedgerService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        history: Arc<dyn HistoryServiceTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            history,
            clock,
        }
    }
}

#[async_trait]
impl LedgerServiceTrait for LedgerService {
    async fn execute_trade(
        &self,
        user_id: &str,
        ticker: &str,
        action: TradeAction,
        quote_price: Money,
        quantity: Money,
    ) -> Result<Order> {
        let path = CollectionPath::root(USERS_COLLECTION).doc(user_id);

        // Conflicting trades on one user fail fast; the caller resubmits
        // against a fresh quote.
        run_transaction(
            self.store.as_ref(),
            &path,
            TransactionOptions::single_attempt(),
            |mut user: User| {
                user.portfolio = user
                    .portfolio
                    .apply_trade(action, ticker, quote_price, quantity)?;
                Ok((user, ()))
            },
        )
        .await?;
        debug!("{} {} {} @ {} for {}", action, quantity, ticker, quote_price, user_id);

        let order = Order {
            date: self.clock.now(),
            ticker: ticker.to_string(),
            action,
            size: quantity,
            price: quote_price,
        };
        // Outside the transaction: the portfolio is already committed.
        if let Err(e) = self.history.append_order(user_id, &order).await {
            warn!(
                "Trade for {} committed but its order was not logged: {}",
                user_id, e
            );
            return Err(e);
        }
        Ok(order)
    }
}
