use std::sync::Arc;

use crate::config::{Config, LogFormat, StoreKind};
use papertrade_core::{
    accounts::{AccountService, AccountServiceTrait},
    history::{HistoryService, HistoryServiceTrait},
    ledger::{LedgerService, LedgerServiceTrait},
    provisioning::ProvisioningInterceptor,
    store::{DocumentStore, InMemoryDocumentStore},
    utils::{Clock, SystemClock},
};
use papertrade_storage_sqlite::SqliteDocumentStore;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub history_service: Arc<dyn HistoryServiceTrait>,
    pub provisioning: ProvisioningInterceptor,
    pub clock: Arc<dyn Clock>,
    pub valuation_retention: chrono::Duration,
}

pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store: Arc<dyn DocumentStore> = match config.store {
        StoreKind::Sqlite => {
            tracing::info!("Database path in use: {}", config.db_path);
            Arc::new(SqliteDocumentStore::open(&config.db_path)?)
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Arc::new(InMemoryDocumentStore::new())
        }
    };
    Ok(Arc::new(assemble(store, Arc::new(SystemClock), config)))
}

/// Wires the services over an already opened store.
pub fn assemble(
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    config: &Config,
) -> AppState {
    let account_service: Arc<dyn AccountServiceTrait> = Arc::new(AccountService::new(
        store.clone(),
        clock.clone(),
        config.initial_cash,
    ));
    let history_service: Arc<dyn HistoryServiceTrait> =
        Arc::new(HistoryService::new(store.clone()));
    let ledger_service: Arc<dyn LedgerServiceTrait> = Arc::new(LedgerService::new(
        store,
        history_service.clone(),
        clock.clone(),
    ));

    AppState {
        provisioning: ProvisioningInterceptor::new(account_service.clone()),
        account_service,
        ledger_service,
        history_service,
        clock,
        valuation_retention: config.valuation_retention,
    }
}
