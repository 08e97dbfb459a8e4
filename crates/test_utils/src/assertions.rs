//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for ledger types that give
//! more meaningful error messages than standard assertions.

use chrono::NaiveDate;
use core_kernel::Money;
use domain_payment::{InstallmentStatus, PaymentRecord, PaymentStatus};
use rust_decimal::Decimal;

/// Asserts that two Money values are approximately equal within a tolerance
///
/// # Panics
///
/// Panics if the currencies don't match or the amounts differ by more than tolerance
pub fn assert_money_approx_eq(actual: &Money, expected: &Money, tolerance: Decimal) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );

    let diff = (actual.amount() - expected.amount()).abs();
    assert!(
        diff <= tolerance,
        "Money amounts differ by more than tolerance: actual={}, expected={}, diff={}, tolerance={}",
        actual.amount(),
        expected.amount(),
        diff,
        tolerance
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {} {}",
        money.currency().symbol(),
        money.amount()
    );
}

/// Asserts that money values sum to a total
pub fn assert_money_sum_equals(parts: &[Money], total: &Money) {
    let sum = parts.iter().fold(Money::zero(total.currency()), |acc, m| {
        acc.checked_add(m).expect("Currency mismatch in sum")
    });

    assert_eq!(
        sum.amount(),
        total.amount(),
        "Sum of parts ({}) doesn't equal total ({})",
        sum.amount(),
        total.amount()
    );
}

/// Asserts that a Decimal is within a range (inclusive)
pub fn assert_decimal_in_range(value: Decimal, min: Decimal, max: Decimal) {
    assert!(
        value >= min && value <= max,
        "Value {} not in range [{}, {}]",
        value,
        min,
        max
    );
}

/// Asserts the derived payment status
pub fn assert_payment_status(record: &PaymentRecord, expected: PaymentStatus) {
    let actual = record.compute_status();
    assert_eq!(
        actual,
        expected,
        "Expected payment status {}, got {} ({} of {} installments paid)",
        expected,
        actual,
        record.installments.iter().filter(|i| i.is_paid()).count(),
        record.installments.len()
    );
}

/// Asserts every invariant that must hold for a payment record on `today`
///
/// - at least one installment
/// - paid installments carry a paid date, unpaid ones do not
/// - stored status agrees with the paid date
/// - progress stays within `[0, 100]`
/// - record status agrees with the paid count
pub fn assert_ledger_consistent(record: &PaymentRecord, today: NaiveDate) {
    assert!(!record.installments.is_empty(), "Payment record has no installments");

    for (n, installment) in record.installments.iter().enumerate() {
        let paid = installment.status == InstallmentStatus::Paid;
        assert_eq!(
            paid,
            installment.paid_date.is_some(),
            "Installment #{} has status {:?} but paid date {:?}",
            n + 1,
            installment.status,
            installment.paid_date
        );
    }

    assert_decimal_in_range(record.compute_progress(), Decimal::ZERO, Decimal::ONE_HUNDRED);

    let paid = record.installments.iter().filter(|i| i.is_paid()).count();
    let expected = match paid {
        0 => PaymentStatus::Pending,
        n if n == record.installments.len() => PaymentStatus::Paid,
        _ => PaymentStatus::Partial,
    };
    assert_payment_status(record, expected);

    let summary = record.summary(today);
    assert_eq!(summary.paid_count + summary.pending_count + summary.overdue_count, record.installments.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DateFixtures, SampleData};
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_approx_eq_passes() {
        let a = Money::usd(dec!(100.00));
        let b = Money::usd(dec!(100.01));
        assert_money_approx_eq(&a, &b, dec!(0.02));
    }

    #[test]
    #[should_panic(expected = "Money amounts differ")]
    fn test_money_approx_eq_fails() {
        let a = Money::usd(dec!(100.00));
        let b = Money::usd(dec!(101.00));
        assert_money_approx_eq(&a, &b, dec!(0.50));
    }

    #[test]
    fn test_sample_ledgers_are_consistent() {
        let data = SampleData::new();
        for sub in data.subscriptions() {
            assert_ledger_consistent(&sub.payment, DateFixtures::today());
        }
        for training in data.trainings() {
            assert_ledger_consistent(&training.payment, DateFixtures::today());
        }
    }
}
