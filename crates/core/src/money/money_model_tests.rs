//! Tests for the fixed-point money type.

#[cfg(test)]
mod tests {
    use crate::money::{Money, MoneyWire};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn same_sign(m: Money) -> bool {
        !(m.units() > 0 && m.nanos() < 0) && !(m.units() < 0 && m.nanos() > 0)
    }

    // ==================== Construction ====================

    #[test]
    fn test_new_fixes_mismatched_signs() {
        let m = Money::new(5, -1);
        assert_eq!(m.units(), 4);
        assert_eq!(m.nanos(), 999_999_999);

        let m = Money::new(-5, 1);
        assert_eq!(m.units(), -4);
        assert_eq!(m.nanos(), -999_999_999);
    }

    #[test]
    fn test_new_carries_excess_nanos() {
        let m = Money::new(1, 1_500_000_000);
        assert_eq!(m.units(), 2);
        assert_eq!(m.nanos(), 500_000_000);
    }

    #[test]
    fn test_checked_new_overflow() {
        assert!(Money::checked_new(i64::MAX, 1_000_000_000).is_none());
        assert!(Money::checked_new(i64::MAX, 999_999_999).is_some());
    }

    // ==================== Arithmetic ====================

    #[test]
    fn test_add_renormalizes() {
        let a = Money::new(1, 600_000_000);
        let b = Money::new(0, 600_000_000);
        assert_eq!(a + b, Money::new(2, 200_000_000));

        let c = Money::new(-3, -250_000_000);
        let sum = a + c;
        assert_eq!(sum, Money::new(-1, -650_000_000));
        assert!(same_sign(sum));
    }

    #[test]
    fn test_sub_crossing_zero() {
        let diff = Money::new(0, 100) - Money::new(0, 300);
        assert_eq!(diff, Money::new(0, -200));
        assert!(diff.is_negative());
    }

    #[test]
    fn test_multiply_fractional_price() {
        // 0.5 BTC at 43,210.123456789
        let qty = Money::new(0, 500_000_000);
        let price = Money::new(43_210, 123_456_789);
        let cost = qty * price;
        assert_eq!(cost.to_decimal(), dec!(21605.061728394));
    }

    #[test]
    fn test_multiply_truncates_toward_zero() {
        let a = Money::new(0, 1); // 1e-9
        let b = Money::new(0, 500_000_000); // 0.5
        assert_eq!(a * b, Money::ZERO);

        let neg = Money::new(0, -3) * Money::new(0, 500_000_000);
        assert_eq!(neg, Money::new(0, -1));
    }

    #[test]
    fn test_multiply_large_units_does_not_lose_precision() {
        let a = Money::from_units(3_000_000_000);
        let b = Money::new(2, 123_456_789);
        let product = a * b;
        assert_eq!(product, Money::new(6_370_370_367, 0));
    }

    #[test]
    fn test_checked_mul_overflow() {
        let big = Money::from_units(i64::MAX / 2);
        assert!(big.checked_mul(Money::from_units(4)).is_none());
    }

    #[test]
    fn test_negate_and_is_negative() {
        let m = Money::new(2, 5);
        assert!(!m.is_negative());
        assert!((-m).is_negative());
        assert_eq!(-(-m), m);
        assert!(!(-Money::ZERO).is_negative());
        assert!(Money::new(0, -1).is_negative());
    }

    #[test]
    fn test_ordering_follows_numeric_value() {
        let mut values = vec![
            Money::new(1, 0),
            Money::new(0, -5),
            Money::new(-1, 0),
            Money::new(0, 999_999_999),
        ];
        values.sort();
        assert_eq!(
            values,
            vec![
                Money::new(-1, 0),
                Money::new(0, -5),
                Money::new(0, 999_999_999),
                Money::new(1, 0),
            ]
        );
        assert!(Money::from_units(10) + Money::NANO > Money::from_units(10));
    }

    // ==================== Conversions ====================

    #[test]
    fn test_decimal_round_trip() {
        for s in ["0", "1", "-1", "0.000000001", "-12.5", "98765.432101234"] {
            let d = Decimal::from_str(s).unwrap();
            let m = Money::from_decimal(d).unwrap();
            assert_eq!(m.to_decimal(), d, "round trip of {s}");
        }
    }

    #[test]
    fn test_from_decimal_truncates_extra_digits() {
        let m = Money::from_decimal(dec!(1.1234567899)).unwrap();
        assert_eq!(m, Money::new(1, 123_456_789));
        let m = Money::from_decimal(dec!(-1.1234567899)).unwrap();
        assert_eq!(m, Money::new(-1, -123_456_789));
    }

    #[test]
    fn test_from_decimal_out_of_range() {
        let huge = Decimal::from(i64::MAX) * dec!(10);
        assert!(Money::from_decimal(huge).is_err());
    }

    #[test]
    fn test_display_and_parse() {
        assert_eq!(Money::new(12, 500_000_000).to_string(), "12.5");
        assert_eq!(Money::new(0, -1).to_string(), "-0.000000001");
        assert_eq!(Money::from_units(100_000).to_string(), "100000");
        assert_eq!("12.5".parse::<Money>().unwrap(), Money::new(12, 500_000_000));
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_wire_format() {
        let json = serde_json::to_value(Money::new(-3, -7)).unwrap();
        assert_eq!(json, serde_json::json!({"units": -3, "nanos": -7}));

        // Deserialization is a constructor and normalizes.
        let m: Money = serde_json::from_value(serde_json::json!({"units": 5, "nanos": -1})).unwrap();
        assert_eq!(m, Money::new(4, 999_999_999));

        let wire: MoneyWire = Money::new(1, 2).into();
        assert_eq!(wire, MoneyWire { units: 1, nanos: 2 });
    }
}
