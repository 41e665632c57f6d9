pub mod api;
pub mod config;
pub mod error;
mod main_lib;
pub mod provisioning;
pub mod scheduler;

pub use main_lib::{assemble, build_state, init_tracing, AppState};
