//! Fixed-point money.
//!
//! A [`Money`] is a whole part (`units`) plus a fraction in billionths
//! (`nanos`). Both fields always carry the same sign, or one of them is zero.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_traits::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::constants::{MONEY_SCALE, NANOS_PER_UNIT};
use crate::errors::{Error, Result, ValidationError};

const NANOS: i128 = NANOS_PER_UNIT as i128;

/// Signed fixed-point amount with nine fractional digits.
///
/// Values are immutable; every operation returns a new value. Fields are
/// private so the sign invariant can only be established by the
/// constructors in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "MoneyWire", into = "MoneyWire")]
pub struct Money {
    units: i64,
    nanos: i32,
}

/// Two-field wire form, as stored and sent over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoneyWire {
    pub units: i64,
    pub nanos: i32,
}

impl Money {
    pub const ZERO: Money = Money { units: 0, nanos: 0 };

    /// Smallest positive representable amount.
    pub const NANO: Money = Money { units: 0, nanos: 1 };

    /// Builds a value from possibly unnormalized parts.
    ///
    /// Carries excess nanos into units and fixes up mismatched signs, so
    /// `Money::new(5, -1)` is `4.999999999`.
    ///
    /// # Panics
    /// If the normalized whole part does not fit in an `i64`.
    pub fn new(units: i64, nanos: i32) -> Money {
        match Money::checked_new(units, nanos) {
            Some(m) => m,
            None => panic!("money overflow normalizing {units} units and {nanos} nanos"),
        }
    }

    /// Like [`Money::new`], returning `None` when the result does not fit.
    pub fn checked_new(units: i64, nanos: i32) -> Option<Money> {
        Money::from_total_nanos(units as i128 * NANOS + nanos as i128)
    }

    /// A whole number of units.
    pub const fn from_units(units: i64) -> Money {
        Money { units, nanos: 0 }
    }

    fn from_total_nanos(total: i128) -> Option<Money> {
        // Truncating division keeps remainder and quotient on the same sign.
        let units = i64::try_from(total / NANOS).ok()?;
        let nanos = (total % NANOS) as i32;
        Some(Money { units, nanos })
    }

    fn total_nanos(self) -> i128 {
        self.units as i128 * NANOS + self.nanos as i128
    }

    pub fn units(self) -> i64 {
        self.units
    }

    pub fn nanos(self) -> i32 {
        self.nanos
    }

    pub fn is_negative(self) -> bool {
        self.units < 0 || self.nanos < 0
    }

    pub fn is_zero(self) -> bool {
        self.units == 0 && self.nanos == 0
    }

    /// Strictly greater than zero.
    pub fn is_positive(self) -> bool {
        !self.is_zero() && !self.is_negative()
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        Money::from_total_nanos(self.total_nanos() + rhs.total_nanos())
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        Money::from_total_nanos(self.total_nanos() - rhs.total_nanos())
    }

    pub fn checked_neg(self) -> Option<Money> {
        Money::from_total_nanos(-self.total_nanos())
    }

    /// Multiplies through a `Decimal` intermediate and truncates the product
    /// back to nine fractional digits (toward zero).
    pub fn checked_mul(self, rhs: Money) -> Option<Money> {
        let product = self.to_decimal().checked_mul(rhs.to_decimal())?;
        Money::from_decimal(product).ok()
    }

    /// Exact decimal value of this amount.
    pub fn to_decimal(self) -> Decimal {
        Decimal::from(self.units) + Decimal::new(self.nanos as i64, MONEY_SCALE)
    }

    /// Converts a decimal, truncating digits past the ninth fractional place.
    ///
    /// Fails when the whole part does not fit in an `i64`.
    pub fn from_decimal(value: Decimal) -> Result<Money> {
        let out_of_range = || {
            Error::Validation(ValidationError::OutOfRange(format!(
                "{value} cannot be represented as money"
            )))
        };
        let quantized = value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::ToZero);
        let whole = quantized.trunc();
        let fraction = quantized - whole;
        let units = whole.to_i64().ok_or_else(out_of_range)?;
        let nanos = (fraction * Decimal::from(NANOS_PER_UNIT))
            .to_i32()
            .ok_or_else(out_of_range)?;
        Ok(Money { units, nanos })
    }
}

impl PartialOrd for Money {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Money {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_nanos().cmp(&other.total_nanos())
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        match self.checked_add(rhs) {
            Some(m) => m,
            None => panic!("attempt to add money with overflow"),
        }
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        match self.checked_sub(rhs) {
            Some(m) => m,
            None => panic!("attempt to subtract money with overflow"),
        }
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        match self.checked_neg() {
            Some(m) => m,
            None => panic!("attempt to negate money with overflow"),
        }
    }
}

impl Mul for Money {
    type Output = Money;

    fn mul(self, rhs: Money) -> Money {
        match self.checked_mul(rhs) {
            Some(m) => m,
            None => panic!("attempt to multiply money with overflow"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal().normalize())
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(s: &str) -> Result<Money> {
        let value = Decimal::from_str(s.trim())?;
        Money::from_decimal(value)
    }
}

impl TryFrom<MoneyWire> for Money {
    type Error = String;

    fn try_from(wire: MoneyWire) -> std::result::Result<Money, String> {
        Money::checked_new(wire.units, wire.nanos).ok_or_else(|| {
            format!(
                "money out of range: {} units, {} nanos",
                wire.units, wire.nanos
            )
        })
    }
}

impl From<Money> for MoneyWire {
    fn from(m: Money) -> Self {
        MoneyWire {
            units: m.units,
            nanos: m.nanos,
        }
    }
}

impl TryFrom<Decimal> for Money {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Money> {
        Money::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(m: Money) -> Self {
        m.to_decimal()
    }
}
