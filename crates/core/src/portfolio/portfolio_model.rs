//! Portfolio domain model and the trade-application algorithm.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::money::Money;

/// Side of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(TradeAction::Buy),
            "SELL" => Ok(TradeAction::Sell),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "unknown trade action '{other}'"
            )))),
        }
    }
}

/// Cash plus asset positions owned by one user.
///
/// Positions that reach exactly zero are dropped, so a buy followed by a
/// sell of the same size leaves no trace in the map.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub cash: Money,
    #[serde(default)]
    pub positions: BTreeMap<String, Money>,
}

impl Portfolio {
    /// A portfolio holding only cash.
    pub fn with_cash(cash: Money) -> Self {
        Self {
            cash,
            positions: BTreeMap::new(),
        }
    }

    /// Quantity held of `ticker`, zero when absent.
    pub fn position(&self, ticker: &str) -> Money {
        self.positions.get(ticker).copied().unwrap_or(Money::ZERO)
    }

    /// Applies a trade at `quote_price` and returns the resulting portfolio.
    ///
    /// Pure: the receiver is left untouched and no I/O happens, so this is
    /// safe to run inside a store transaction body.
    pub fn apply_trade(
        &self,
        action: TradeAction,
        ticker: &str,
        quote_price: Money,
        quantity: Money,
    ) -> Result<Portfolio> {
        validate_trade_input(ticker, quote_price, quantity)?;

        let notional = quote_price.checked_mul(quantity).ok_or_else(|| {
            Error::Validation(ValidationError::OutOfRange(format!(
                "trade value of {quantity} {ticker} at {quote_price} overflows"
            )))
        })?;
        if notional.is_zero() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "{quantity} {ticker} at {quote_price} is worth less than the smallest amount"
            ))));
        }
        let held = self.position(ticker);
        let mut next = self.clone();

        match action {
            TradeAction::Buy => {
                if notional > self.cash {
                    return Err(Error::InsufficientFunds(format!(
                        "not enough cash ({}) to buy {} {} ({})",
                        self.cash, quantity, ticker, notional
                    )));
                }
                next.cash = checked(self.cash.checked_sub(notional))?;
                next.set_position(ticker, checked(held.checked_add(quantity))?);
            }
            TradeAction::Sell => {
                if quantity > held {
                    return Err(Error::InsufficientHolding(format!(
                        "not enough {} ({}) to sell {}",
                        ticker, held, quantity
                    )));
                }
                next.set_position(ticker, checked(held.checked_sub(quantity))?);
                next.cash = checked(self.cash.checked_add(notional))?;
            }
        }

        Ok(next)
    }

    /// Total value of cash plus every position priced at `quotes`.
    ///
    /// A non-zero position without a quote is an error rather than being
    /// valued at zero.
    pub fn valuation(&self, quotes: &HashMap<String, Money>) -> Result<Money> {
        let mut total = self.cash;
        for (ticker, quantity) in &self.positions {
            if quantity.is_zero() {
                continue;
            }
            let quote = quotes.get(ticker).ok_or_else(|| {
                Error::Validation(ValidationError::MissingField(format!("quote for {ticker}")))
            })?;
            let value = quantity.checked_mul(*quote).ok_or_else(|| {
                Error::Validation(ValidationError::OutOfRange(format!(
                    "value of {quantity} {ticker} overflows"
                )))
            })?;
            total = checked(total.checked_add(value))?;
        }
        Ok(total)
    }

    fn set_position(&mut self, ticker: &str, quantity: Money) {
        if quantity.is_zero() {
            self.positions.remove(ticker);
        } else {
            self.positions.insert(ticker.to_string(), quantity);
        }
    }
}

/// Free-function form of [`Portfolio::apply_trade`].
pub fn apply_trade(
    portfolio: &Portfolio,
    action: TradeAction,
    ticker: &str,
    quote_price: Money,
    quantity: Money,
) -> Result<Portfolio> {
    portfolio.apply_trade(action, ticker, quote_price, quantity)
}

fn validate_trade_input(ticker: &str, quote_price: Money, quantity: Money) -> Result<()> {
    if ticker.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "ticker".to_string(),
        )));
    }
    if !quantity.is_positive() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "quantity must be positive, got {quantity}"
        ))));
    }
    if !quote_price.is_positive() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "quote price must be positive, got {quote_price}"
        ))));
    }
    Ok(())
}

fn checked(value: Option<Money>) -> Result<Money> {
    value.ok_or_else(|| {
        Error::Validation(ValidationError::OutOfRange(
            "portfolio balance overflows".to_string(),
        ))
    })
}
