//! Background scheduler for valuation history retention.
//!
//! Periodically rotates every user's valuation history so it stays bounded.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::main_lib::AppState;

/// Spawns the retention sweep, running every `every`.
pub fn start_retention_scheduler(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        info!("Retention scheduler started ({}s interval)", every.as_secs());

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            run_retention_sweep(&state).await;
        }
    });
}

/// Rotates the valuation history of every user once.
///
/// Failures for one user are logged and the sweep moves on. Returns the
/// number of valuations deleted.
pub async fn run_retention_sweep(state: &AppState) -> usize {
    let cutoff = state.clock.now() - state.valuation_retention;
    let users = match state.account_service.list_users().await {
        Ok(users) => users,
        Err(e) => {
            warn!("Retention sweep skipped: could not list users ({})", e);
            return 0;
        }
    };

    let mut deleted = 0;
    for user in &users {
        match state
            .history_service
            .rotate_valuation_history(&user.id, cutoff)
            .await
        {
            Ok(count) => deleted += count,
            Err(e) => warn!("Failed to rotate valuations of {}: {}", user.id, e),
        }
    }
    debug!(
        "Retention sweep over {} user(s) removed {} valuation(s)",
        users.len(),
        deleted
    );
    deleted
}
