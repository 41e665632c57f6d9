//! History module - append-only order log and the valuation time series.

mod history_model;
mod history_service;
mod history_service_tests;
mod history_traits;

pub use history_model::{Order, ValuationHistory};
pub use history_service::HistoryService;
pub use history_traits::HistoryServiceTrait;
