//! Pre-built Test Fixtures
//!
//! The academy's sample data: three learners, four course subscriptions and
//! three instructor-led trainings. Dates are early 2024; pick `today` from
//! [`DateFixtures`] so that overdue and reminder results stay predictable.

use chrono::NaiveDate;
use core_kernel::{Currency, Money};
use domain_enrollment::{
    InMemorySubscriptionStore, InMemoryTrainingStore, InMemoryUserStore, Subscription,
    SubscriptionDetails, SubscriptionStatus, TrainingDetails, TrainingEnrollment, TrainingStatus,
    User, UserRole,
};
use domain_payment::{Installment, PaymentRecord, PaymentType};
use rust_decimal_macros::dec;

/// Shorthand for a calendar date; panics on an invalid one
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid fixture date")
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn usd(amount: u32) -> Money {
        Money::usd(amount.into())
    }

    /// Price of the CS50 subscription
    pub fn cs50_total() -> Money {
        Money::usd(dec!(299))
    }

    /// Creates a zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }

    /// Three decimal places
    pub fn tnd_450() -> Money {
        Money::new(dec!(450), Currency::TND)
    }
}

/// Fixture for dates the sample data is built around
pub struct DateFixtures;

impl DateFixtures {
    /// Mid-February: CS50's third installment is due soon, Data Science is overdue
    pub fn today() -> NaiveDate {
        date(2024, 2, 20)
    }

    /// Before anything in the sample data falls due
    pub fn before_first_due() -> NaiveDate {
        date(2023, 12, 1)
    }

    /// After every sample installment is due
    pub fn year_end() -> NaiveDate {
        date(2024, 12, 31)
    }
}

/// Fixture for users
pub struct UserFixtures;

impl UserFixtures {
    pub fn john() -> User {
        let mut user = User::new(
            "John Doe",
            "john.doe@protectedconsulting.com",
            UserRole::User,
            date(2023, 6, 15),
        )
        .expect("valid fixture user");
        user.record_login(date(2024, 1, 20));
        user
    }

    pub fn jane() -> User {
        let mut user = User::new(
            "Jane Smith",
            "jane.smith@protectedconsulting.com",
            UserRole::User,
            date(2023, 8, 22),
        )
        .expect("valid fixture user");
        user.record_login(date(2024, 1, 19));
        user
    }

    /// Inactive since December
    pub fn mike() -> User {
        let mut user = User::new(
            "Mike Johnson",
            "mike.johnson@protectedconsulting.com",
            UserRole::User,
            date(2023, 4, 10),
        )
        .expect("valid fixture user");
        user.record_login(date(2023, 12, 15));
        user.deactivate();
        user
    }

    pub fn admin() -> User {
        User::new(
            "Sami Sahraoui",
            "admin@protectedconsulting.com",
            UserRole::Admin,
            date(2023, 1, 1),
        )
        .expect("valid fixture user")
    }
}

fn usd(amount: u32) -> Money {
    MoneyFixtures::usd(amount)
}

/// Fixture for payment records
pub struct PaymentFixtures;

impl PaymentFixtures {
    /// $299 in three monthly installments, two of them paid
    pub fn cs50() -> PaymentRecord {
        let mut record = PaymentRecord::create(
            usd(299),
            PaymentType::CreditCard,
            "3 Monthly Installments",
            vec![
                Installment::paid(usd(100), date(2024, 1, 15), date(2024, 1, 14)),
                Installment::paid(usd(100), date(2024, 2, 15), date(2024, 2, 14)),
                Installment::pending(usd(99), date(2024, 3, 15)),
            ],
        )
        .expect("valid fixture record");
        record
            .attach_proof("Payment Receipt - Jan 2024", "/payment-receipt-january.jpg", date(2024, 1, 14))
            .expect("valid fixture proof");
        record
            .attach_proof("Payment Receipt - Feb 2024", "/payment-receipt-february.jpg", date(2024, 2, 14))
            .expect("valid fixture proof");
        record
    }

    /// $149 paid in full by bank transfer
    pub fn machine_learning() -> PaymentRecord {
        let mut record = PaymentRecord::create(
            usd(149),
            PaymentType::BankTransfer,
            "One-time Payment",
            vec![Installment::paid(usd(149), date(2024, 1, 1), date(2024, 1, 2))],
        )
        .expect("valid fixture record");
        record
            .attach_proof("Bank Transfer Receipt", "/bank-transfer-receipt.png", date(2024, 1, 2))
            .expect("valid fixture proof");
        record
    }

    /// $199 due January 10th and never paid
    pub fn data_science() -> PaymentRecord {
        PaymentRecord::create(
            usd(199),
            PaymentType::CreditCard,
            "Monthly Payment",
            vec![Installment::pending(usd(199), date(2024, 1, 10))],
        )
        .expect("valid fixture record")
    }

    /// $599 over six months by PayPal, first month paid
    pub fn web_bootcamp() -> PaymentRecord {
        let mut installments = vec![Installment::paid(usd(100), date(2024, 1, 1), date(2024, 1, 1))];
        for month in 2..=5 {
            installments.push(Installment::pending(usd(100), date(2024, month, 1)));
        }
        installments.push(Installment::pending(usd(99), date(2024, 6, 1)));

        let mut record = PaymentRecord::create(usd(599), PaymentType::PayPal, "6 Monthly Installments", installments)
            .expect("valid fixture record");
        record
            .attach_proof("PayPal Receipt - January", "/generic-online-payment-receipt.png", date(2024, 1, 1))
            .expect("valid fixture proof");
        record
    }

    /// $1200 in two halves, first one paid
    pub fn pmp() -> PaymentRecord {
        PaymentRecord::create(
            usd(1200),
            PaymentType::BankTransfer,
            "2 Installments",
            vec![
                Installment::paid(usd(600), date(2024, 1, 15), date(2024, 1, 12)),
                Installment::pending(usd(600), date(2024, 3, 15)),
            ],
        )
        .expect("valid fixture record")
    }

    pub fn mba() -> PaymentRecord {
        PaymentRecord::create(
            usd(1500),
            PaymentType::CreditCard,
            "One-time Payment",
            vec![Installment::paid(usd(1500), date(2023, 9, 1), date(2023, 8, 28))],
        )
        .expect("valid fixture record")
    }

    pub fn agile() -> PaymentRecord {
        PaymentRecord::create(
            usd(900),
            PaymentType::Cash,
            "One-time Payment",
            vec![Installment::pending(usd(900), date(2024, 3, 1))],
        )
        .expect("valid fixture record")
    }
}

fn subscription(
    owner: &User,
    course_name: &str,
    batch_number: &str,
    batch_date: NaiveDate,
    status: SubscriptionStatus,
    payment: PaymentRecord,
) -> Subscription {
    Subscription::new(
        SubscriptionDetails {
            user_id: owner.id,
            user_name: owner.name.clone(),
            platform: "EdX".to_string(),
            course_name: course_name.to_string(),
            batch_number: batch_number.to_string(),
            batch_date,
            valid_until: None,
            status,
        },
        payment,
    )
    .expect("valid fixture subscription")
}

fn training(
    owner: &User,
    program: &str,
    period: (NaiveDate, NaiveDate),
    progress: u8,
    status: TrainingStatus,
    payment: PaymentRecord,
) -> TrainingEnrollment {
    TrainingEnrollment::new(
        TrainingDetails {
            user_id: owner.id,
            user_name: owner.name.clone(),
            program: program.to_string(),
            provider: "Protected Consulting".to_string(),
            instructor: "Sami Sahraoui".to_string(),
            start_date: period.0,
            end_date: period.1,
            progress,
            status,
        },
        payment,
    )
    .expect("valid fixture training")
}

/// The complete sample data set, with consistent ids and user names
#[derive(Debug, Clone)]
pub struct SampleData {
    pub admin: User,
    pub john: User,
    pub jane: User,
    pub mike: User,
    pub cs50: Subscription,
    pub machine_learning: Subscription,
    pub data_science: Subscription,
    pub web_bootcamp: Subscription,
    pub pmp: TrainingEnrollment,
    pub mba: TrainingEnrollment,
    pub agile: TrainingEnrollment,
}

impl SampleData {
    pub fn new() -> Self {
        let admin = UserFixtures::admin();
        let john = UserFixtures::john();
        let jane = UserFixtures::jane();
        let mike = UserFixtures::mike();

        let cs50 = subscription(
            &john,
            "CS50: Introduction to Computer Science",
            "2024-01",
            date(2024, 1, 15),
            SubscriptionStatus::Active,
            PaymentFixtures::cs50(),
        );
        let machine_learning = subscription(
            &john,
            "Machine Learning Fundamentals",
            "2024-02",
            date(2024, 2, 1),
            SubscriptionStatus::Active,
            PaymentFixtures::machine_learning(),
        );
        let data_science = subscription(
            &jane,
            "Data Science Professional Certificate",
            "2023-12",
            date(2023, 12, 10),
            SubscriptionStatus::Expired,
            PaymentFixtures::data_science(),
        );
        let web_bootcamp = subscription(
            &mike,
            "Web Development Bootcamp",
            "2024-01",
            date(2024, 1, 1),
            SubscriptionStatus::Active,
            PaymentFixtures::web_bootcamp(),
        );

        let pmp = training(
            &john,
            "PMP Certification",
            (date(2024, 1, 15), date(2024, 4, 15)),
            60,
            TrainingStatus::InProgress,
            PaymentFixtures::pmp(),
        );
        let mba = training(
            &jane,
            "MBA Essentials",
            (date(2023, 9, 1), date(2023, 12, 15)),
            100,
            TrainingStatus::Completed,
            PaymentFixtures::mba(),
        );
        let agile = training(
            &john,
            "Agile Project Management",
            (date(2024, 3, 1), date(2024, 5, 30)),
            0,
            TrainingStatus::Upcoming,
            PaymentFixtures::agile(),
        );

        Self {
            admin,
            john,
            jane,
            mike,
            cs50,
            machine_learning,
            data_science,
            web_bootcamp,
            pmp,
            mba,
            agile,
        }
    }

    /// Learners and the admin
    pub fn users(&self) -> Vec<User> {
        vec![self.admin.clone(), self.john.clone(), self.jane.clone(), self.mike.clone()]
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        vec![
            self.cs50.clone(),
            self.machine_learning.clone(),
            self.data_science.clone(),
            self.web_bootcamp.clone(),
        ]
    }

    pub fn trainings(&self) -> Vec<TrainingEnrollment> {
        vec![self.pmp.clone(), self.mba.clone(), self.agile.clone()]
    }

    /// In-memory stores pre-loaded with the sample data
    pub async fn stores(&self) -> (InMemoryUserStore, InMemorySubscriptionStore, InMemoryTrainingStore) {
        (
            InMemoryUserStore::with_users(self.users()).await,
            InMemorySubscriptionStore::with_subscriptions(self.subscriptions()).await,
            InMemoryTrainingStore::with_trainings(self.trainings()).await,
        )
    }
}

impl Default for SampleData {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_payment::PaymentStatus;

    #[test]
    fn test_sample_payment_statuses() {
        let data = SampleData::new();
        assert_eq!(data.cs50.payment.compute_status(), PaymentStatus::Partial);
        assert_eq!(data.machine_learning.payment.compute_status(), PaymentStatus::Paid);
        assert_eq!(data.data_science.payment.compute_status(), PaymentStatus::Pending);
        assert_eq!(data.web_bootcamp.payment.compute_status(), PaymentStatus::Partial);
        assert!(data.data_science.payment.has_overdue(DateFixtures::today()));
    }

    #[test]
    fn test_sample_names_match_owners() {
        let data = SampleData::new();
        for sub in data.subscriptions() {
            let owner = data.users().into_iter().find(|u| u.id == sub.user_id).unwrap();
            assert_eq!(owner.name, sub.user_name);
        }
        assert!(!data.mike.is_active());
        assert!(data.admin.is_admin());
    }
}
