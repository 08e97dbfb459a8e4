//! Course subscriptions
//!
//! A subscription enrolls a user in a batch of an online course and carries
//! the payment plan for it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::temporal::days_until;
use core_kernel::{SubscriptionId, UserId};
use domain_payment::PaymentRecord;
use crate::error::EnrollmentError;

/// Subscription lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    #[default]
    Pending,
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Pending => "pending",
        };
        f.write_str(s)
    }
}

/// Editable fields of a subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionDetails {
    pub user_id: UserId,
    pub user_name: String,
    pub platform: String,
    pub course_name: String,
    pub batch_number: String,
    pub batch_date: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub status: SubscriptionStatus,
}

impl SubscriptionDetails {
    fn validate(&self) -> Result<(), EnrollmentError> {
        let required = [
            ("user_name", &self.user_name),
            ("platform", &self.platform),
            ("course_name", &self.course_name),
            ("batch_number", &self.batch_number),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(EnrollmentError::validation(format!("{} must not be empty", field)));
        }
        if let Some(valid_until) = self.valid_until {
            if valid_until < self.batch_date {
                return Err(EnrollmentError::validation(format!(
                    "valid_until {} is before batch date {}",
                    valid_until, self.batch_date
                )));
            }
        }
        Ok(())
    }
}

/// Full replace of a subscription's editable fields
///
/// The payment record is only replaced when one is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    #[serde(flatten)]
    pub details: SubscriptionDetails,
    #[serde(default)]
    pub payment: Option<PaymentRecord>,
}

/// A user's subscription to one course batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub user_name: String,
    pub platform: String,
    pub course_name: String,
    pub batch_number: String,
    pub batch_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<NaiveDate>,
    pub status: SubscriptionStatus,
    pub payment: PaymentRecord,
}

impl Subscription {
    pub fn new(details: SubscriptionDetails, payment: PaymentRecord) -> Result<Self, EnrollmentError> {
        details.validate()?;
        payment.validate()?;

        let subscription = Self {
            id: SubscriptionId::new_v7(),
            user_id: details.user_id,
            user_name: details.user_name.trim().to_string(),
            platform: details.platform.trim().to_string(),
            course_name: details.course_name.trim().to_string(),
            batch_number: details.batch_number.trim().to_string(),
            batch_date: details.batch_date,
            valid_until: details.valid_until,
            status: details.status,
            payment,
        };
        debug!(subscription_id = %subscription.id, course = %subscription.course_name, "Subscription created");
        Ok(subscription)
    }

    pub fn details(&self) -> SubscriptionDetails {
        SubscriptionDetails {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            platform: self.platform.clone(),
            course_name: self.course_name.clone(),
            batch_number: self.batch_number.clone(),
            batch_date: self.batch_date,
            valid_until: self.valid_until,
            status: self.status,
        }
    }

    pub fn update(&mut self, update: SubscriptionUpdate) -> Result<(), EnrollmentError> {
        update.details.validate()?;
        if let Some(ref payment) = update.payment {
            payment.validate()?;
        }

        let details = update.details;
        self.user_id = details.user_id;
        self.user_name = details.user_name.trim().to_string();
        self.platform = details.platform.trim().to_string();
        self.course_name = details.course_name.trim().to_string();
        self.batch_number = details.batch_number.trim().to_string();
        self.batch_date = details.batch_date;
        self.valid_until = details.valid_until;
        self.status = details.status;
        if let Some(payment) = update.payment {
            self.payment = payment;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Due date of the first unpaid installment
    pub fn next_payment_date(&self) -> Option<NaiveDate> {
        self.payment.next_due_installment().map(|i| i.due_date)
    }

    /// True when access ends within `window_days` days (and not today or earlier)
    pub fn expires_within(&self, today: NaiveDate, window_days: u32) -> bool {
        self.valid_until
            .map(|end| {
                let left = days_until(today, end);
                left > 0 && left <= i64::from(window_days)
            })
            .unwrap_or(false)
    }

    /// Marks an active subscription expired once `valid_until` has passed
    ///
    /// Returns true if the status changed.
    pub fn expire_if_lapsed(&mut self, today: NaiveDate) -> bool {
        match self.valid_until {
            Some(end) if end < today && self.status == SubscriptionStatus::Active => {
                self.status = SubscriptionStatus::Expired;
                debug!(subscription_id = %self.id, "Subscription expired");
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Money;
    use domain_payment::{Installment, PaymentType};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn details() -> SubscriptionDetails {
        SubscriptionDetails {
            user_id: UserId::new_v7(),
            user_name: "John Doe".to_string(),
            platform: "EdX".to_string(),
            course_name: "Machine Learning Fundamentals".to_string(),
            batch_number: "2024-02".to_string(),
            batch_date: date(2024, 2, 1),
            valid_until: Some(date(2024, 8, 1)),
            status: SubscriptionStatus::Active,
        }
    }

    fn payment() -> PaymentRecord {
        PaymentRecord::create(
            Money::usd(dec!(149)),
            PaymentType::BankTransfer,
            "One-time Payment",
            vec![Installment::paid(Money::usd(dec!(149)), date(2024, 1, 1), date(2024, 1, 2))],
        )
        .unwrap()
    }

    #[test]
    fn test_new_subscription() {
        let sub = Subscription::new(details(), payment()).unwrap();
        assert!(sub.is_active());
        assert_eq!(sub.next_payment_date(), None);
    }

    #[test]
    fn test_rejects_empty_course_name() {
        let mut d = details();
        d.course_name = " ".to_string();
        let err = Subscription::new(d, payment()).unwrap_err();
        assert!(err.to_string().contains("course_name"));
    }

    #[test]
    fn test_rejects_valid_until_before_batch() {
        let mut d = details();
        d.valid_until = Some(date(2024, 1, 1));
        assert!(Subscription::new(d, payment()).is_err());
    }

    #[test]
    fn test_expiry_window() {
        let sub = Subscription::new(details(), payment()).unwrap();
        assert!(sub.expires_within(date(2024, 7, 25), 7));
        assert!(!sub.expires_within(date(2024, 7, 24), 7));
        assert!(!sub.expires_within(date(2024, 8, 1), 7));
    }

    #[test]
    fn test_expire_if_lapsed() {
        let mut sub = Subscription::new(details(), payment()).unwrap();
        assert!(!sub.expire_if_lapsed(date(2024, 8, 1)));
        assert!(sub.expire_if_lapsed(date(2024, 8, 2)));
        assert_eq!(sub.status, SubscriptionStatus::Expired);
    }

    #[test]
    fn test_update_keeps_payment_when_absent() {
        let mut sub = Subscription::new(details(), payment()).unwrap();
        let mut d = details();
        d.status = SubscriptionStatus::Pending;
        sub.update(SubscriptionUpdate { details: d, payment: None }).unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Pending);
        assert_eq!(sub.payment.total_amount, Money::usd(dec!(149)));
    }
}
