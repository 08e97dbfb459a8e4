//! Stats, export and reminder DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{SubscriptionId, TrainingId, UserId};
use domain_enrollment::{Subscription, TrainingEnrollment, User};
use domain_payment::PaymentReminder;

/// Everything in the store, as served by the export endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub exported_at: DateTime<Utc>,
    pub users: Vec<User>,
    pub subscriptions: Vec<Subscription>,
    pub trainings: Vec<TrainingEnrollment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentOwnerKind {
    Subscription,
    Training,
}

/// An installment reminder with the enrollment it belongs to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub owner: PaymentOwnerKind,
    pub owner_id: String,
    pub user_id: UserId,
    pub user_name: String,
    /// Course name or training program
    pub title: String,
    #[serde(flatten)]
    pub reminder: PaymentReminder,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringSubscription {
    pub subscription_id: SubscriptionId,
    pub user_id: UserId,
    pub user_name: String,
    pub course_name: String,
    pub valid_until: NaiveDate,
    pub days_left: i64,
}

/// An upcoming training starting within the reminder window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartingTraining {
    pub training_id: TrainingId,
    pub user_id: UserId,
    pub user_name: String,
    pub program: String,
    pub start_date: NaiveDate,
    pub days_left: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersResponse {
    pub today: NaiveDate,
    pub window_days: u32,
    pub payments: Vec<ReminderEntry>,
    pub expiring_subscriptions: Vec<ExpiringSubscription>,
    pub starting_trainings: Vec<StartingTraining>,
}
