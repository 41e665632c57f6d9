//! Clock abstraction and canonical timestamp keys.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};

/// Source of the current time.
///
/// Abstracted so tests can pin order keys and valuation instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Order document key: the UTC instant with nanosecond precision,
/// e.g. `2021-05-03T17:04:11.123456789Z`.
///
/// Two trades in the same nanosecond produce the same key.
pub fn order_key(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Truncates to whole seconds, the valuation history granularity.
pub fn truncate_to_second(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_nanosecond(0).unwrap_or(at)
}

/// Valuation document key: the instant truncated to the second,
/// e.g. `2021-05-03T17:04:11Z`.
pub fn valuation_key(at: DateTime<Utc>) -> String {
    truncate_to_second(at).to_rfc3339_opts(SecondsFormat::Secs, true)
}
