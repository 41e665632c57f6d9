use async_trait::async_trait;

use crate::errors::Result;
use crate::history::Order;
use crate::money::Money;
use crate::portfolio::TradeAction;

/// Trait defining the contract for trade execution.
#[async_trait]
pub trait LedgerServiceTrait: Send + Sync {
    /// Executes a trade against the user's portfolio and logs the order.
    ///
    /// The portfolio update commits on its own. When logging the order fails
    /// afterwards, the error is returned but the portfolio change stands.
    async fn execute_trade(
        &self,
        user_id: &str,
        ticker: &str,
        action: TradeAction,
        quote_price: Money,
        quantity: Money,
    ) -> Result<Order>;
}
