use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{bail, Context};
use papertrade_core::{constants::DEFAULT_INITIAL_CASH_UNITS, Money};

/// Which document store backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite,
    /// Volatile; everything is lost on restart.
    Memory,
}

impl FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "memory" => Ok(StoreKind::Memory),
            other => bail!("unknown store '{other}', expected 'sqlite' or 'memory'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => bail!("unknown log format '{other}', expected 'text' or 'json'"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub store: StoreKind,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub initial_cash: Money,
    pub valuation_retention: chrono::Duration,
    pub retention_interval: Duration,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreKind::Sqlite,
            db_path: "./db/app.db".to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            initial_cash: Money::from_units(DEFAULT_INITIAL_CASH_UNITS),
            valuation_retention: chrono::Duration::days(30),
            retention_interval: Duration::from_secs(3600),
            log_format: LogFormat::Text,
        }
    }
}

/// Parses `key` when set, `None` when unset.
fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("Invalid {key}: '{raw}'")),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Reads `PT_*` variables (and a `.env` file when present) over the defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let cors_allow = match std::env::var("PT_CORS_ALLOW_ORIGINS") {
            Ok(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => defaults.cors_allow,
        };
        let initial_cash = env_parse::<i64>("PT_INITIAL_CASH")?
            .map(Money::from_units)
            .unwrap_or(defaults.initial_cash);
        if initial_cash.is_negative() {
            bail!("PT_INITIAL_CASH must not be negative");
        }
        let retention_days = env_parse::<u32>("PT_VALUATION_RETENTION_DAYS")?;
        let retention_secs = env_parse::<u64>("PT_RETENTION_INTERVAL_SECS")?
            .unwrap_or(defaults.retention_interval.as_secs());
        if retention_secs == 0 {
            bail!("PT_RETENTION_INTERVAL_SECS must be positive");
        }

        Ok(Self {
            listen_addr: env_parse("PT_LISTEN_ADDR")?.unwrap_or(defaults.listen_addr),
            store: env_parse("PT_STORE")?.unwrap_or(defaults.store),
            db_path: std::env::var("PT_DB_PATH").unwrap_or(defaults.db_path),
            cors_allow,
            request_timeout: env_parse::<u64>("PT_REQUEST_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            initial_cash,
            valuation_retention: retention_days
                .map(|d| chrono::Duration::days(i64::from(d)))
                .unwrap_or(defaults.valuation_retention),
            retention_interval: Duration::from_secs(retention_secs),
            log_format: env_parse("PT_LOG_FORMAT")?.unwrap_or(defaults.log_format),
        })
    }
}
