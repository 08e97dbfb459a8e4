//! Integration Tests for the enrollment admin crates
//!
//! These tests verify cross-crate workflows: enrollments built from payment
//! plans, stored through the ports, and read back as statistics and reminders.

use core_kernel::{Currency, Money};
use domain_enrollment::{
    AdminStats, InMemorySubscriptionStore, SubscriptionPort, SubscriptionQuery, SubscriptionSortKey,
    SubscriptionStatus, TrainingPort, TrainingQuery, TrainingStatus,
};
use domain_payment::reminders::due_soon;
use domain_payment::{
    InstallmentSchedule, PaymentPolicy, PaymentStatus, PaymentType, PlanInterval, ReminderKind,
};
use rust_decimal_macros::dec;
use test_utils::*;

mod enrollment_workflow {
    use super::*;

    /// A learner pays a three-month plan off installment by installment
    #[tokio::test]
    async fn test_subscription_paid_in_installments() {
        let jane = UserFixtures::jane();
        let payment = InstallmentSchedule::equal_split(
            MoneyFixtures::cs50_total(),
            3,
            date(2024, 1, 31),
            PlanInterval::Monthly,
        )
        .unwrap()
        .into_record(PaymentType::CreditCard)
        .unwrap();
        let subscription = TestSubscriptionBuilder::new()
            .for_user(&jane)
            .with_payment(payment)
            .build();

        let store = InMemorySubscriptionStore::new();
        let mut stored = store.create_subscription(subscription, None).await.unwrap();
        assert_money_sum_equals(
            &stored.payment.installments.iter().map(|i| i.amount).collect::<Vec<_>>(),
            &MoneyFixtures::cs50_total(),
        );

        let ids: Vec<_> = stored.payment.installments.iter().map(|i| i.id).collect();
        let due: Vec<_> = stored.payment.installments.iter().map(|i| i.due_date).collect();
        assert_eq!(due, vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]);

        for (n, id) in ids.iter().enumerate() {
            stored.payment.mark_installment_paid(*id, due[n]).unwrap();
            store.update_subscription(stored.clone(), None).await.unwrap();
            assert_ledger_consistent(&stored.payment, DateFixtures::today());
        }

        let reloaded = store.get_subscription(stored.id, None).await.unwrap();
        assert_payment_status(&reloaded.payment, PaymentStatus::Paid);
        assert_eq!(reloaded.payment.compute_progress(), dec!(100));
        assert!(reloaded.next_payment_date().is_none());
    }

    #[test]
    fn test_grace_window_rejects_early_payment() {
        let mut record = PaymentFixtures::agile();
        let id = record.installments[0].id;
        let policy = PaymentPolicy::with_grace_days(14);

        assert!(record
            .mark_installment_paid_with(id, date(2024, 1, 2), &policy)
            .unwrap_err()
            .is_validation());
        record
            .mark_installment_paid_with(id, date(2024, 2, 20), &policy)
            .unwrap();
        assert_payment_status(&record, PaymentStatus::Paid);
    }

    #[test]
    fn test_training_lifecycle_with_payment() {
        let mut training = TestTrainingBuilder::new().build();
        assert_eq!(training.status, TrainingStatus::Upcoming);

        training.transition_to(TrainingStatus::InProgress).unwrap();
        training.set_progress(75).unwrap();
        training.transition_to(TrainingStatus::Completed).unwrap();
        assert_eq!(training.progress, 100);
        assert!(training.transition_to(TrainingStatus::InProgress).is_err());

        let id = training.payment.installments[0].id;
        training.payment.mark_installment_paid(id, date(2024, 1, 15)).unwrap();
        assert_payment_status(&training.payment, PaymentStatus::Paid);
    }
}

mod sample_data_queries {
    use super::*;

    #[tokio::test]
    async fn test_queries_over_sample_data() {
        let data = SampleData::new();
        let (_, subscriptions, trainings) = data.stores().await;

        let partial = SubscriptionQuery {
            payment_status: Some(PaymentStatus::Partial),
            sort: Some(SubscriptionSortKey::PaymentProgress),
            ..Default::default()
        };
        let page = subscriptions.find_subscriptions(partial, None).await.unwrap();
        let courses: Vec<_> = page.items.iter().map(|s| s.course_name.as_str()).collect();
        // 100/599 paid before 200/299
        assert_eq!(courses, vec!["Web Development Bootcamp", "CS50: Introduction to Computer Science"]);

        let johns = trainings
            .find_trainings(TrainingQuery::for_user(data.john.id), None)
            .await
            .unwrap();
        assert_eq!(johns.total, 2);

        let expired = SubscriptionQuery {
            status: Some(SubscriptionStatus::Expired),
            ..Default::default()
        };
        let page = subscriptions.find_subscriptions(expired, None).await.unwrap();
        assert_eq!(page.items[0].id, data.data_science.id);
    }

    #[test]
    fn test_dashboard_stats() {
        let data = SampleData::new();
        let stats = AdminStats::compute(
            &data.users(),
            &data.subscriptions(),
            &data.trainings(),
            DateFixtures::today(),
        );

        assert_eq!(stats.total_users, 4);
        assert_eq!(stats.active_subscriptions, 3);
        assert_eq!(stats.in_progress_trainings, 1);
        assert_eq!(stats.payments.paid_records, 2);
        assert_eq!(stats.payments.partial_records, 3);
        assert_eq!(stats.payments.pending_records, 2);
        // Data Science (Jan 10) and Web Development Bootcamp (Feb 1)
        assert_eq!(stats.payments.records_with_overdue, 2);

        // 200 + 149 + 100 + 600 + 1500
        assert_eq!(stats.payments.collected_in(Currency::USD), Money::usd(dec!(2549)));
        // 99 + 199 + 499 + 600 + 900
        assert_eq!(stats.payments.outstanding_in(Currency::USD), Money::usd(dec!(2297)));
    }

    #[test]
    fn test_reminders_on_sample_date() {
        let data = SampleData::new();
        let today = DateFixtures::today();

        let bootcamp = due_soon(&data.web_bootcamp.payment, today, 10);
        assert_eq!(bootcamp.len(), 2);
        assert_eq!(bootcamp[0].kind, ReminderKind::Overdue { days_late: 19 });
        assert_eq!(bootcamp[1].kind, ReminderKind::DueSoon { days_left: 10 });
        assert_eq!(bootcamp[1].installment_number, 3);

        // Nothing within a week except what is already late
        let agile = due_soon(&data.agile.payment, today, 7);
        assert!(agile.is_empty());

        let paid_up = due_soon(&data.machine_learning.payment, today, 30);
        assert!(paid_up.is_empty());
    }
}
