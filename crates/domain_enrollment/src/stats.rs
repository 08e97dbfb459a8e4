//! Admin dashboard statistics

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money};
use domain_payment::{PaymentRecord, PaymentStatus};
use crate::subscription::{Subscription, SubscriptionStatus};
use crate::training::{TrainingEnrollment, TrainingStatus};
use crate::user::User;

/// Collected and outstanding amounts in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub collected: Money,
    pub outstanding: Money,
}

/// Aggregates over every payment record, subscriptions and trainings alike
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStats {
    pub paid_records: usize,
    pub partial_records: usize,
    pub pending_records: usize,
    /// Records with at least one unpaid installment past its due date
    pub records_with_overdue: usize,
    /// One entry per currency in use, in order of first appearance
    pub totals: Vec<CurrencyTotals>,
}

impl PaymentStats {
    fn add(&mut self, record: &PaymentRecord, today: NaiveDate) {
        match record.compute_status() {
            PaymentStatus::Paid => self.paid_records += 1,
            PaymentStatus::Partial => self.partial_records += 1,
            PaymentStatus::Pending => self.pending_records += 1,
        }
        if record.has_overdue(today) {
            self.records_with_overdue += 1;
        }

        let currency = record.currency();
        let collected = record.compute_paid_amount().amount();
        let outstanding = record.outstanding_amount().amount();
        match self.totals.iter_mut().find(|t| t.currency == currency) {
            Some(totals) => {
                totals.collected = Money::new(totals.collected.amount() + collected, currency);
                totals.outstanding = Money::new(totals.outstanding.amount() + outstanding, currency);
            }
            None => self.totals.push(CurrencyTotals {
                currency,
                collected: Money::new(collected, currency),
                outstanding: Money::new(outstanding, currency),
            }),
        }
    }

    /// Collected amount in `currency`, zero if unused
    pub fn collected_in(&self, currency: Currency) -> Money {
        self.totals
            .iter()
            .find(|t| t.currency == currency)
            .map(|t| t.collected)
            .unwrap_or_else(|| Money::zero(currency))
    }

    pub fn outstanding_in(&self, currency: Currency) -> Money {
        self.totals
            .iter()
            .find(|t| t.currency == currency)
            .map(|t| t.outstanding)
            .unwrap_or_else(|| Money::zero(currency))
    }
}

/// Headline numbers for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_users: usize,
    pub active_users: usize,
    pub total_subscriptions: usize,
    pub active_subscriptions: usize,
    pub expired_subscriptions: usize,
    pub total_trainings: usize,
    pub in_progress_trainings: usize,
    pub completed_trainings: usize,
    pub payments: PaymentStats,
}

impl AdminStats {
    pub fn compute(
        users: &[User],
        subscriptions: &[Subscription],
        trainings: &[TrainingEnrollment],
        today: NaiveDate,
    ) -> Self {
        let mut payments = PaymentStats::default();
        for record in subscriptions
            .iter()
            .map(|s| &s.payment)
            .chain(trainings.iter().map(|t| &t.payment))
        {
            payments.add(record, today);
        }

        Self {
            total_users: users.len(),
            active_users: users.iter().filter(|u| u.is_active()).count(),
            total_subscriptions: subscriptions.len(),
            active_subscriptions: count(subscriptions, |s| s.status == SubscriptionStatus::Active),
            expired_subscriptions: count(subscriptions, |s| s.status == SubscriptionStatus::Expired),
            total_trainings: trainings.len(),
            in_progress_trainings: count(trainings, |t| t.status == TrainingStatus::InProgress),
            completed_trainings: count(trainings, |t| t.status == TrainingStatus::Completed),
            payments,
        }
    }

    /// Share of all payment records that are fully paid, in percent
    pub fn paid_ratio(&self) -> Decimal {
        let p = &self.payments;
        let total = p.paid_records + p.partial_records + p.pending_records;
        if total == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(p.paid_records as u64) / Decimal::from(total as u64) * Decimal::ONE_HUNDRED
    }
}

fn count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}
