use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::portfolio::TradeAction;

/// An executed trade, as recorded in the user's order log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub date: DateTime<Utc>,
    pub ticker: String,
    pub action: TradeAction,
    /// Quantity traded.
    pub size: Money,
    /// Quote price per unit the trade executed at.
    pub price: Money,
}

/// Portfolio value at a point in time.
///
/// `date` is always whole seconds; one entry exists per second at most.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationHistory {
    pub date: DateTime<Utc>,
    pub value: Money,
}
