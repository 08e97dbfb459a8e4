//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use chrono::{Months, NaiveDate};
use core_kernel::Money;
use domain_enrollment::{
    Subscription, SubscriptionDetails, SubscriptionStatus, TrainingDetails, TrainingEnrollment,
    TrainingStatus, User,
};
use domain_payment::{Installment, PaymentRecord, PaymentType};

use crate::fixtures::{date, MoneyFixtures, UserFixtures};

/// Builder for payment records
///
/// Without explicit installments the whole total becomes one pending
/// installment due on the start date.
pub struct TestPaymentRecordBuilder {
    total: Money,
    payment_type: PaymentType,
    plan: Option<String>,
    start: NaiveDate,
    installments: Vec<Installment>,
}

impl Default for TestPaymentRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPaymentRecordBuilder {
    pub fn new() -> Self {
        Self {
            total: MoneyFixtures::cs50_total(),
            payment_type: PaymentType::CreditCard,
            plan: None,
            start: date(2024, 1, 15),
            installments: Vec::new(),
        }
    }

    pub fn with_total(mut self, total: Money) -> Self {
        self.total = total;
        self
    }

    pub fn with_payment_type(mut self, payment_type: PaymentType) -> Self {
        self.payment_type = payment_type;
        self
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Due date used for the default installment and the first monthly one
    pub fn starting(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn with_pending(mut self, amount: Money, due_date: NaiveDate) -> Self {
        self.installments.push(Installment::pending(amount, due_date));
        self
    }

    pub fn with_paid(mut self, amount: Money, due_date: NaiveDate, paid_date: NaiveDate) -> Self {
        self.installments.push(Installment::paid(amount, due_date, paid_date));
        self
    }

    /// Appends `count` pending installments of `amount`, one month apart
    pub fn with_monthly(mut self, count: u32, amount: Money) -> Self {
        for month in 0..count {
            let due = self
                .start
                .checked_add_months(Months::new(month))
                .expect("due date in range");
            self.installments.push(Installment::pending(amount, due));
        }
        self
    }

    pub fn build(self) -> PaymentRecord {
        let installments = if self.installments.is_empty() {
            vec![Installment::pending(self.total, self.start)]
        } else {
            self.installments
        };
        let plan = self.plan.unwrap_or_else(|| match installments.len() {
            1 => "One-time Payment".to_string(),
            n => format!("{} Installments", n),
        });
        PaymentRecord::create(self.total, self.payment_type, plan, installments)
            .expect("builder produced an invalid payment record")
    }
}

/// Builder for subscriptions
pub struct TestSubscriptionBuilder {
    owner: User,
    platform: String,
    course_name: String,
    batch_number: String,
    batch_date: NaiveDate,
    valid_until: Option<NaiveDate>,
    status: SubscriptionStatus,
    payment: Option<PaymentRecord>,
}

impl Default for TestSubscriptionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestSubscriptionBuilder {
    pub fn new() -> Self {
        Self {
            owner: UserFixtures::john(),
            platform: "EdX".to_string(),
            course_name: "CS50: Introduction to Computer Science".to_string(),
            batch_number: "2024-01".to_string(),
            batch_date: date(2024, 1, 15),
            valid_until: None,
            status: SubscriptionStatus::Active,
            payment: None,
        }
    }

    pub fn for_user(mut self, owner: &User) -> Self {
        self.owner = owner.clone();
        self
    }

    pub fn with_course(mut self, course_name: impl Into<String>) -> Self {
        self.course_name = course_name.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_batch(mut self, number: impl Into<String>, batch_date: NaiveDate) -> Self {
        self.batch_number = number.into();
        self.batch_date = batch_date;
        self
    }

    pub fn valid_until(mut self, end: NaiveDate) -> Self {
        self.valid_until = Some(end);
        self
    }

    pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_payment(mut self, payment: PaymentRecord) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn build(self) -> Subscription {
        let payment = self
            .payment
            .unwrap_or_else(|| TestPaymentRecordBuilder::new().starting(self.batch_date).build());
        Subscription::new(
            SubscriptionDetails {
                user_id: self.owner.id,
                user_name: self.owner.name.clone(),
                platform: self.platform,
                course_name: self.course_name,
                batch_number: self.batch_number,
                batch_date: self.batch_date,
                valid_until: self.valid_until,
                status: self.status,
            },
            payment,
        )
        .expect("builder produced an invalid subscription")
    }
}

/// Builder for training enrollments
pub struct TestTrainingBuilder {
    owner: User,
    program: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    progress: u8,
    status: TrainingStatus,
    payment: Option<PaymentRecord>,
}

impl Default for TestTrainingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTrainingBuilder {
    pub fn new() -> Self {
        Self {
            owner: UserFixtures::john(),
            program: "PMP Certification".to_string(),
            start_date: date(2024, 1, 15),
            end_date: date(2024, 4, 15),
            progress: 0,
            status: TrainingStatus::Upcoming,
            payment: None,
        }
    }

    pub fn for_user(mut self, owner: &User) -> Self {
        self.owner = owner.clone();
        self
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn in_progress(mut self, progress: u8) -> Self {
        self.status = TrainingStatus::InProgress;
        self.progress = progress;
        self
    }

    pub fn completed(mut self) -> Self {
        self.status = TrainingStatus::Completed;
        self
    }

    pub fn with_payment(mut self, payment: PaymentRecord) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn build(self) -> TrainingEnrollment {
        let payment = self.payment.unwrap_or_else(|| {
            TestPaymentRecordBuilder::new()
                .with_total(MoneyFixtures::usd(1200))
                .starting(self.start_date)
                .build()
        });
        TrainingEnrollment::new(
            TrainingDetails {
                user_id: self.owner.id,
                user_name: self.owner.name.clone(),
                program: self.program,
                provider: "Protected Consulting".to_string(),
                instructor: "Sami Sahraoui".to_string(),
                start_date: self.start_date,
                end_date: self.end_date,
                progress: self.progress,
                status: self.status,
            },
            payment,
        )
        .expect("builder produced an invalid training")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_payment::PaymentStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_record_is_single_pending_installment() {
        let record = TestPaymentRecordBuilder::new().build();
        assert_eq!(record.installments.len(), 1);
        assert_eq!(record.compute_status(), PaymentStatus::Pending);
        assert_eq!(record.plan, "One-time Payment");
    }

    #[test]
    fn test_monthly_installments() {
        let record = TestPaymentRecordBuilder::new()
            .with_total(MoneyFixtures::usd(300))
            .starting(date(2024, 1, 31))
            .with_monthly(3, MoneyFixtures::usd(100))
            .build();
        let dates: Vec<_> = record.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);
        assert_eq!(record.installment_sum().amount(), dec!(300));
    }

    #[test]
    fn test_completed_training_has_full_progress() {
        let training = TestTrainingBuilder::new().completed().build();
        assert_eq!(training.progress, 100);
    }
}
