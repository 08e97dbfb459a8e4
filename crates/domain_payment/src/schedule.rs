//! Installment schedule generation
//!
//! Builds the common plans offered at enrollment time: a single payment, or
//! a total split evenly over N weekly or monthly installments.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use core_kernel::Money;
use crate::error::PaymentError;
use crate::installment::Installment;
use crate::record::{PaymentRecord, PaymentType};

/// Spacing between consecutive due dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanInterval {
    OneTime,
    Weekly,
    Monthly,
}

impl PlanInterval {
    fn nth_due_date(&self, first_due: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            PlanInterval::OneTime => Some(first_due),
            PlanInterval::Weekly => first_due.checked_add_days(Days::new(7 * u64::from(n))),
            // Anchored on the first due date so Jan 31 gives Feb 29, Mar 31, ...
            PlanInterval::Monthly => first_due.checked_add_months(Months::new(n)),
        }
    }
}

/// An evenly split installment plan, before it is attached to a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentSchedule {
    total: Money,
    interval: PlanInterval,
    amounts: Vec<Money>,
    due_dates: Vec<NaiveDate>,
}

impl InstallmentSchedule {
    /// Splits `total` into `count` installments starting at `first_due`
    ///
    /// Amounts differ by at most one minor unit, the extra units going to
    /// the earliest installments. A `OneTime` interval forces a count of 1.
    pub fn equal_split(
        total: Money,
        count: u32,
        first_due: NaiveDate,
        interval: PlanInterval,
    ) -> Result<Self, PaymentError> {
        if !total.is_positive() {
            return Err(PaymentError::validation(format!(
                "Total amount must be positive, got {}",
                total.amount()
            )));
        }
        if count == 0 {
            return Err(PaymentError::validation("Installment count must be at least 1"));
        }
        let count = if interval == PlanInterval::OneTime { 1 } else { count };

        let amounts = total.allocate(count)?;
        if amounts.iter().any(|a| !a.is_positive()) {
            return Err(PaymentError::validation(format!(
                "{} is too small to split into {} installments",
                total, count
            )));
        }

        let due_dates = (0..count)
            .map(|n| {
                interval
                    .nth_due_date(first_due, n)
                    .ok_or_else(|| PaymentError::validation("Due date out of calendar range"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            total,
            interval,
            amounts,
            due_dates,
        })
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn amounts(&self) -> &[Money] {
        &self.amounts
    }

    pub fn due_dates(&self) -> &[NaiveDate] {
        &self.due_dates
    }

    /// Plan description shown next to the payment method
    pub fn plan_label(&self) -> String {
        match (self.interval, self.len()) {
            (PlanInterval::OneTime, _) | (_, 1) => "One-time Payment".to_string(),
            (PlanInterval::Weekly, n) => format!("{} Weekly Installments", n),
            (PlanInterval::Monthly, n) => format!("{} Monthly Installments", n),
        }
    }

    /// Fresh pending installments for this schedule
    pub fn installments(&self) -> Vec<Installment> {
        self.amounts
            .iter()
            .zip(&self.due_dates)
            .map(|(amount, due)| Installment::pending(*amount, *due))
            .collect()
    }

    pub fn into_record(self, payment_type: PaymentType) -> Result<PaymentRecord, PaymentError> {
        let installments = self.installments();
        PaymentRecord::create(self.total, payment_type, self.plan_label(), installments)
    }
}
