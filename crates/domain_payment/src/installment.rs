//! Installments
//!
//! An installment is one dated slice of a payment plan. Its stored status is
//! only authoritative for `paid`; whether an unpaid installment is overdue
//! depends on the date it is looked at, see [`Installment::status_on`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{InstallmentId, Money};
use crate::error::PaymentError;
use crate::proof::FileReference;

/// Largest amount accepted for a plan total or a single installment
///
/// Keeps every sum, balance and progress ratio of a record well inside
/// `Decimal` range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000);

/// Checks that `amount` is positive and at most [`MAX_AMOUNT`]
pub fn check_amount(what: &str, amount: &Money) -> Result<(), PaymentError> {
    if !amount.is_positive() {
        return Err(PaymentError::validation(format!(
            "{} must be positive, got {}",
            what,
            amount.amount()
        )));
    }
    if amount.amount() > MAX_AMOUNT {
        return Err(PaymentError::validation(format!(
            "{} must not exceed {}, got {}",
            what,
            MAX_AMOUNT,
            amount.amount()
        )));
    }
    Ok(())
}

/// Installment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Pending,
    Paid,
    /// Past its due date and unpaid; derived, never set by a payment action
    Overdue,
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InstallmentStatus::Pending => "pending",
            InstallmentStatus::Paid => "paid",
            InstallmentStatus::Overdue => "overdue",
        };
        f.write_str(s)
    }
}

/// One scheduled partial payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub id: InstallmentId,
    pub amount: Money,
    pub due_date: NaiveDate,
    /// Set if and only if `status` is `Paid`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub status: InstallmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<FileReference>,
}

impl Installment {
    /// Creates an unpaid installment
    pub fn pending(amount: Money, due_date: NaiveDate) -> Self {
        Self {
            id: InstallmentId::new_v7(),
            amount,
            due_date,
            paid_date: None,
            status: InstallmentStatus::Pending,
            proof: None,
        }
    }

    /// Creates an installment that was already settled on `paid_date`
    pub fn paid(amount: Money, due_date: NaiveDate, paid_date: NaiveDate) -> Self {
        Self {
            paid_date: Some(paid_date),
            status: InstallmentStatus::Paid,
            ..Self::pending(amount, due_date)
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == InstallmentStatus::Paid
    }

    /// Effective status as of `today`
    ///
    /// A stored `Overdue` whose due date is not yet past reads as `Pending`.
    pub fn status_on(&self, today: NaiveDate) -> InstallmentStatus {
        match self.status {
            InstallmentStatus::Paid => InstallmentStatus::Paid,
            _ if self.due_date < today => InstallmentStatus::Overdue,
            _ => InstallmentStatus::Pending,
        }
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.status_on(today) == InstallmentStatus::Overdue
    }

    /// Checks the amount and the paid-date/status pairing
    pub fn validate(&self) -> Result<(), PaymentError> {
        check_amount("Installment amount", &self.amount)?;
        match (self.status, self.paid_date) {
            (InstallmentStatus::Paid, None) => Err(PaymentError::validation(format!(
                "Installment {} is paid but has no paid date",
                self.id
            ))),
            (InstallmentStatus::Pending | InstallmentStatus::Overdue, Some(_)) => {
                Err(PaymentError::validation(format!(
                    "Installment {} has a paid date but is not paid",
                    self.id
                )))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn settle(&mut self, paid_date: NaiveDate) {
        self.status = InstallmentStatus::Paid;
        self.paid_date = Some(paid_date);
    }

    pub(crate) fn reopen(&mut self) {
        self.status = InstallmentStatus::Pending;
        self.paid_date = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_on_derives_overdue() {
        let inst = Installment::pending(Money::usd(dec!(199)), date(2024, 1, 10));
        assert_eq!(inst.status_on(date(2024, 1, 10)), InstallmentStatus::Pending);
        assert_eq!(inst.status_on(date(2024, 1, 11)), InstallmentStatus::Overdue);
    }

    #[test]
    fn test_paid_is_never_overdue() {
        let inst = Installment::paid(Money::usd(dec!(100)), date(2024, 1, 15), date(2024, 2, 1));
        assert_eq!(inst.status_on(date(2025, 1, 1)), InstallmentStatus::Paid);
    }

    #[test]
    fn test_stored_overdue_with_future_due_date_reads_pending() {
        let mut inst = Installment::pending(Money::usd(dec!(100)), date(2024, 6, 1));
        inst.status = InstallmentStatus::Overdue;
        assert_eq!(inst.status_on(date(2024, 5, 1)), InstallmentStatus::Pending);
    }

    #[test]
    fn test_validate_paid_date_pairing() {
        let mut inst = Installment::pending(Money::usd(dec!(100)), date(2024, 6, 1));
        inst.paid_date = Some(date(2024, 6, 1));
        assert!(inst.validate().is_err());

        let mut inst = Installment::pending(Money::usd(dec!(100)), date(2024, 6, 1));
        inst.status = InstallmentStatus::Paid;
        assert!(inst.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_amount() {
        let inst = Installment::pending(Money::usd(dec!(0)), date(2024, 6, 1));
        assert!(matches!(inst.validate(), Err(PaymentError::Validation(_))));
    }

    #[test]
    fn test_settle_and_reopen() {
        let mut inst = Installment::pending(Money::usd(dec!(100)), date(2024, 6, 1));
        inst.settle(date(2024, 5, 30));
        assert!(inst.is_paid());
        assert!(inst.validate().is_ok());

        inst.reopen();
        assert_eq!(inst.status, InstallmentStatus::Pending);
        assert_eq!(inst.paid_date, None);
    }
}
