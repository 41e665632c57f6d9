/// Top-level collection holding one document per user
pub const USERS_COLLECTION: &str = "users";

/// Per-user sub-collection of executed orders
pub const ORDERS_COLLECTION: &str = "orders";

/// Per-user sub-collection of portfolio valuation snapshots
pub const VALUATIONS_COLLECTION: &str = "valuations";

/// Field of a valuation document carrying its timestamp
pub const VALUATION_DATE_FIELD: &str = "date";

/// Nanos per whole unit of money
pub const NANOS_PER_UNIT: i64 = 1_000_000_000;

/// Scale (fractional digits) of the nanos field
pub const MONEY_SCALE: u32 = 9;

/// Cash a fresh account starts with, in whole units
pub const DEFAULT_INITIAL_CASH_UNITS: i64 = 100_000;

/// Upper bound on documents touched by one batched write
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;
