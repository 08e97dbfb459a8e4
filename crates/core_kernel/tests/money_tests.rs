//! Integration tests for the Money module

use core_kernel::{Money, Currency, MoneyError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_rounds_to_four_decimal_places() {
        let m = Money::new(dec!(100.123456789), Currency::USD);
        assert_eq!(m.amount(), dec!(100.1235));
    }

    #[test]
    fn test_from_minor_respects_currency_precision() {
        assert_eq!(Money::from_minor(10000, Currency::JPY).amount(), dec!(10000));
        assert_eq!(Money::from_minor(12345, Currency::TND).amount(), dec!(12.345));
    }

    #[test]
    fn test_default_currency_is_usd() {
        assert_eq!(Currency::default(), Currency::USD);
    }
}

mod predicates {
    use super::*;

    #[test]
    fn test_zero_is_not_positive() {
        let m = Money::zero(Currency::USD);
        assert!(m.is_zero());
        assert!(!m.is_positive());
        assert!(!m.is_negative());
    }

    #[test]
    fn test_negative_amount() {
        let m = Money::usd(dec!(-0.01));
        assert!(m.is_negative());
        assert!(!m.is_positive());
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_checked_sub_mismatch() {
        let usd = Money::usd(dec!(10));
        let gbp = Money::new(dec!(10), Currency::GBP);
        assert_eq!(
            usd.checked_sub(&gbp),
            Err(MoneyError::CurrencyMismatch("USD".to_string(), "GBP".to_string()))
        );
    }

    #[test]
    fn test_sum_of_empty_is_zero() {
        let total = Money::sum(std::iter::empty(), Currency::EUR).unwrap();
        assert_eq!(total, Money::zero(Currency::EUR));
    }

    #[test]
    fn test_sum_rejects_mixed_currencies() {
        let amounts = [Money::usd(dec!(1)), Money::new(dec!(1), Currency::EUR)];
        assert!(Money::sum(amounts.iter(), Currency::USD).is_err());
    }

    #[test]
    fn test_percentage_of_installment_plan() {
        let paid = Money::usd(dec!(100));
        let total = Money::usd(dec!(599));
        let pct = paid.percentage_of(&total).unwrap();
        assert_eq!(pct.round_dp(1), dec!(16.7));
    }
}

mod allocation {
    use super::*;

    #[test]
    fn test_allocate_zero_parts_fails() {
        let m = Money::usd(dec!(100));
        assert!(matches!(m.allocate(0), Err(MoneyError::InvalidAmount(_))));
    }

    #[test]
    fn test_allocate_even_split() {
        let parts = Money::usd(dec!(300)).allocate(3).unwrap();
        assert!(parts.iter().all(|p| p.amount() == dec!(100)));
    }

    #[test]
    fn test_allocate_spreads_remainder_first() {
        let parts = Money::usd(dec!(100)).allocate(3).unwrap();
        let amounts: Vec<Decimal> = parts.iter().map(|p| p.amount()).collect();
        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
    }
}
