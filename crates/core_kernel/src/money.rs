//! Money types with precise decimal arithmetic
//!
//! Course fees and installment amounts are carried as `Money` so that sums,
//! balances and progress ratios never pass through floating point.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use thiserror::Error;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    TND,
    MAD,
    JPY,
}

impl Currency {
    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            Currency::TND => 3,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::CAD => "C$",
            Currency::TND => "DT",
            Currency::MAD => "DH",
            Currency::JPY => "¥",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::TND => "TND",
            Currency::MAD => "MAD",
            Currency::JPY => "JPY",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Arithmetic overflow")]
    Overflow,
}

/// A monetary amount with associated currency
///
/// Amounts are kept at 4 decimal places internally; `round_to_currency`
/// brings them back to the currency's minor unit for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self {
            amount: amount.round_dp(4),
            currency,
        }
    }

    /// Creates Money in US dollars, the default currency of the catalogue
    pub fn usd(amount: Decimal) -> Self {
        Self::new(amount, Currency::USD)
    }

    /// Creates Money from an integer amount in minor units (e.g., cents)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        let divisor = Decimal::new(10_i64.pow(currency.decimal_places()), 0);
        Self::new(Decimal::new(minor_units, 0) / divisor, currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Rounds to the currency's standard decimal places
    pub fn round_to_currency(&self) -> Self {
        Self {
            amount: self.amount.round_dp(self.currency.decimal_places()),
            currency: self.currency,
        }
    }

    /// Checked addition that returns an error on currency mismatch or overflow
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self.amount.checked_add(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch or overflow
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self.amount.checked_sub(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Subtracts, flooring the result at zero
    pub fn saturating_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        let diff = self.checked_sub(other)?;
        Ok(if diff.is_negative() {
            Money::zero(self.currency)
        } else {
            diff
        })
    }

    /// Sums an iterator of amounts that must all be in `currency`
    pub fn sum<'a, I>(amounts: I, currency: Currency) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    /// Expresses this amount as a percentage of `whole`
    ///
    /// Returns `DivisionByZero` when `whole` is zero and `Overflow` when the
    /// ratio does not fit a `Decimal`.
    pub fn percentage_of(&self, whole: &Money) -> Result<Decimal, MoneyError> {
        self.ensure_same_currency(whole)?;
        if whole.amount.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        self.amount
            .checked_div(whole.amount)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or(MoneyError::Overflow)
    }

    /// Splits the money into n parts that sum exactly to the original
    ///
    /// Works in minor units; the leftover minor units go one each to the
    /// first parts.
    pub fn allocate(&self, n: u32) -> Result<Vec<Money>, MoneyError> {
        if n == 0 {
            return Err(MoneyError::InvalidAmount("Cannot allocate to zero parts".to_string()));
        }

        let dp = self.currency.decimal_places();
        let total_minor = self
            .amount
            .checked_mul(Decimal::new(10_i64.pow(dp), 0))
            .ok_or(MoneyError::Overflow)?
            .round()
            .mantissa();

        let base = total_minor / n as i128;
        let remainder = (total_minor % n as i128) as u32;

        (0..n)
            .map(|i| {
                let minor = if i < remainder { base + 1 } else { base };
                i64::try_from(minor)
                    .map(|minor| Money::from_minor(minor, self.currency))
                    .map_err(|_| MoneyError::Overflow)
            })
            .collect()
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{}{:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.checked_add(&other)
            .expect("Currency mismatch in Money::add")
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.checked_sub(&other)
            .expect("Currency mismatch in Money::sub")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_creation() {
        let m = Money::usd(dec!(299));
        assert_eq!(m.amount(), dec!(299));
        assert_eq!(m.currency(), Currency::USD);
    }

    #[test]
    fn test_money_from_minor() {
        let m = Money::from_minor(9900, Currency::USD);
        assert_eq!(m.amount(), dec!(99.00));
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::usd(dec!(100));
        let eur = Money::new(dec!(100), Currency::EUR);

        let result = usd.checked_add(&eur);
        assert!(matches!(result, Err(MoneyError::CurrencyMismatch(_, _))));
    }

    #[test]
    fn test_saturating_sub_floors_at_zero() {
        let small = Money::usd(dec!(50));
        let big = Money::usd(dec!(80));
        assert!(small.saturating_sub(&big).unwrap().is_zero());
        assert_eq!(big.saturating_sub(&small).unwrap().amount(), dec!(30));
    }

    #[test]
    fn test_sum() {
        let parts = [Money::usd(dec!(100)), Money::usd(dec!(100)), Money::usd(dec!(99))];
        let total = Money::sum(parts.iter(), Currency::USD).unwrap();
        assert_eq!(total.amount(), dec!(299));
    }

    #[test]
    fn test_percentage_of() {
        let paid = Money::usd(dec!(200));
        let total = Money::usd(dec!(299));
        let pct = paid.percentage_of(&total).unwrap();
        assert_eq!(pct.round_dp(1), dec!(66.9));

        let zero = Money::zero(Currency::USD);
        assert_eq!(paid.percentage_of(&zero), Err(MoneyError::DivisionByZero));
    }

    #[test]
    fn test_money_allocation() {
        let m = Money::usd(dec!(599));
        let parts = m.allocate(6).unwrap();

        assert_eq!(parts.len(), 6);
        let total = Money::sum(parts.iter(), Currency::USD).unwrap();
        assert_eq!(total, m);
        assert_eq!(parts[0].amount(), dec!(99.84));
        assert_eq!(parts[5].amount(), dec!(99.83));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let huge = Money::usd(Decimal::MAX);
        assert_eq!(huge.checked_add(&Money::usd(dec!(1))), Err(MoneyError::Overflow));
        assert_eq!(
            Money::usd(Decimal::MIN).checked_sub(&Money::usd(dec!(1))),
            Err(MoneyError::Overflow)
        );

        let tiny = Money::usd(dec!(0.0001));
        let paid = Money::usd(dec!(70000000000000000000000000000));
        assert_eq!(paid.percentage_of(&tiny), Err(MoneyError::Overflow));
        assert_eq!(huge.allocate(3), Err(MoneyError::Overflow));
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::usd(dec!(149)).to_string(), "$149.00");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn allocation_sum_equals_original(
            amount in 1i64..1_000_000_000i64,
            parts in 1u32..60u32
        ) {
            let money = Money::from_minor(amount, Currency::USD);
            let allocations = money.allocate(parts).unwrap();

            let total: Decimal = allocations.iter().map(|m| m.amount()).sum();
            prop_assert_eq!(total, money.amount());
        }

        #[test]
        fn percentage_of_self_is_hundred(amount in 1i64..1_000_000_000i64) {
            let money = Money::from_minor(amount, Currency::USD);
            prop_assert_eq!(money.percentage_of(&money).unwrap(), dec!(100));
        }
    }
}
