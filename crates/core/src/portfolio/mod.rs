//! Portfolio module - cash, positions and the pure trade algorithm.

mod portfolio_model;

pub use portfolio_model::{apply_trade, Portfolio, TradeAction};
