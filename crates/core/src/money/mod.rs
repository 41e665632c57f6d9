//! Money module - fixed-point amounts used by every other component.

mod money_model;
mod money_model_tests;

pub use money_model::{Money, MoneyWire};
