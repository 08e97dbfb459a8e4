//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains ledger invariants.

use chrono::{Days, NaiveDate};
use core_kernel::{Currency, Money};
use domain_payment::{Installment, PaymentRecord, PaymentType, PlanInterval};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::CAD),
        Just(Currency::TND),
        Just(Currency::MAD),
        Just(Currency::JPY),
    ]
}

pub fn payment_type_strategy() -> impl Strategy<Value = PaymentType> {
    prop_oneof![
        Just(PaymentType::CreditCard),
        Just(PaymentType::BankTransfer),
        Just(PaymentType::PayPal),
        Just(PaymentType::Cash),
        Just(PaymentType::Check),
    ]
}

pub fn plan_interval_strategy() -> impl Strategy<Value = PlanInterval> {
    prop_oneof![
        Just(PlanInterval::OneTime),
        Just(PlanInterval::Weekly),
        Just(PlanInterval::Monthly),
    ]
}

/// Strategy for installment amounts in cents, $1 to $5000
pub fn installment_cents_strategy() -> impl Strategy<Value = i64> {
    100i64..500_000i64
}

/// Strategy for generating valid USD Money values
pub fn usd_money_strategy() -> impl Strategy<Value = Money> {
    installment_cents_strategy().prop_map(|cents| Money::from_minor(cents, Currency::USD))
}

/// Strategy for dates in 2024
pub fn date_2024_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..366).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .expect("date within 2024")
    })
}

/// Strategy for one installment; about half are paid on their due date
pub fn installment_strategy() -> impl Strategy<Value = Installment> {
    (usd_money_strategy(), date_2024_strategy(), any::<bool>()).prop_map(|(amount, due, paid)| {
        if paid {
            Installment::paid(amount, due, due)
        } else {
            Installment::pending(amount, due)
        }
    })
}

/// Strategy for a USD payment record whose total equals its installment sum
pub fn payment_record_strategy() -> impl Strategy<Value = PaymentRecord> {
    (
        prop::collection::vec(installment_strategy(), 1..8),
        payment_type_strategy(),
    )
        .prop_map(|(installments, payment_type)| {
            let total: Decimal = installments.iter().map(|i| i.amount.amount()).sum();
            let plan = format!("{} Installments", installments.len());
            PaymentRecord::create(Money::usd(total), payment_type, plan, installments)
                .expect("generated record is valid")
        })
}

/// Strategy for installment counts accepted by equal splits
pub fn installment_count_strategy() -> impl Strategy<Value = u32> {
    1u32..=24
}

/// Strategy for generating valid email addresses
pub fn email_strategy() -> impl Strategy<Value = String> {
    ("[a-z]{5,10}", "[a-z]{3,8}")
        .prop_map(|(local, domain)| format!("{}@{}.com", local, domain))
}

/// Strategy for generating full names
pub fn name_strategy() -> impl Strategy<Value = String> {
    ("[A-Z][a-z]{2,10}", "[A-Z][a-z]{2,10}").prop_map(|(first, last)| format!("{} {}", first, last))
}
