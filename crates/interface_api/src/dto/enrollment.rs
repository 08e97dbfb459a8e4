//! Subscription and training DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::UserId;
use domain_enrollment::{
    Subscription, SubscriptionDetails, SubscriptionStatus, TrainingDetails, TrainingEnrollment,
    TrainingStatus, User,
};
use domain_payment::PaymentSummary;

use crate::dto::payment::PaymentPlanRequest;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubscriptionRequest {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 100))]
    pub platform: String,
    #[validate(length(min = 1, max = 300))]
    pub course_name: String,
    #[validate(length(min = 1, max = 50))]
    pub batch_number: String,
    pub batch_date: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    #[serde(default)]
    pub status: SubscriptionStatus,
    pub payment: PaymentPlanRequest,
}

impl CreateSubscriptionRequest {
    /// Splits the request into entity details and the payment plan
    pub fn into_parts(self, owner: &User) -> (SubscriptionDetails, PaymentPlanRequest) {
        let details = SubscriptionDetails {
            user_id: owner.id,
            user_name: owner.name.clone(),
            platform: self.platform,
            course_name: self.course_name,
            batch_number: self.batch_number,
            batch_date: self.batch_date,
            valid_until: self.valid_until,
            status: self.status,
        };
        (details, self.payment)
    }
}

/// Full replace of a subscription; `payment` replaces the plan when present
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSubscriptionRequest {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 100))]
    pub platform: String,
    #[validate(length(min = 1, max = 300))]
    pub course_name: String,
    #[validate(length(min = 1, max = 50))]
    pub batch_number: String,
    pub batch_date: NaiveDate,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub payment: Option<PaymentPlanRequest>,
}

impl UpdateSubscriptionRequest {
    pub fn into_parts(self, owner: &User) -> (SubscriptionDetails, Option<PaymentPlanRequest>) {
        let details = SubscriptionDetails {
            user_id: owner.id,
            user_name: owner.name.clone(),
            platform: self.platform,
            course_name: self.course_name,
            batch_number: self.batch_number,
            batch_date: self.batch_date,
            valid_until: self.valid_until,
            status: self.status,
        };
        (details, self.payment)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTrainingRequest {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 300))]
    pub program: String,
    #[validate(length(min = 1, max = 200))]
    pub provider: String,
    #[validate(length(min = 1, max = 200))]
    pub instructor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    #[validate(range(max = 100))]
    pub progress: u8,
    #[serde(default)]
    pub status: TrainingStatus,
    pub payment: PaymentPlanRequest,
}

impl CreateTrainingRequest {
    pub fn into_parts(self, owner: &User) -> (TrainingDetails, PaymentPlanRequest) {
        let details = TrainingDetails {
            user_id: owner.id,
            user_name: owner.name.clone(),
            program: self.program,
            provider: self.provider,
            instructor: self.instructor,
            start_date: self.start_date,
            end_date: self.end_date,
            progress: self.progress,
            status: self.status,
        };
        (details, self.payment)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateTrainingRequest {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 300))]
    pub program: String,
    #[validate(length(min = 1, max = 200))]
    pub provider: String,
    #[validate(length(min = 1, max = 200))]
    pub instructor: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(range(max = 100))]
    pub progress: u8,
    pub status: TrainingStatus,
    #[serde(default)]
    pub payment: Option<PaymentPlanRequest>,
}

impl UpdateTrainingRequest {
    pub fn into_parts(self, owner: &User) -> (TrainingDetails, Option<PaymentPlanRequest>) {
        let details = TrainingDetails {
            user_id: owner.id,
            user_name: owner.name.clone(),
            program: self.program,
            provider: self.provider,
            instructor: self.instructor,
            start_date: self.start_date,
            end_date: self.end_date,
            progress: self.progress,
            status: self.status,
        };
        (details, self.payment)
    }
}

/// Lifecycle change, optionally with a progress update
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrainingStatusRequest {
    pub status: TrainingStatus,
    #[serde(default)]
    #[validate(range(max = 100))]
    pub progress: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub subscription: Subscription,
    pub payment_summary: PaymentSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_payment_date: Option<NaiveDate>,
}

impl SubscriptionResponse {
    /// Derives lapsed and overdue states as of `today`
    pub fn new(mut subscription: Subscription, today: NaiveDate) -> Self {
        subscription.expire_if_lapsed(today);
        subscription.payment.refresh_overdue(today);
        let payment_summary = subscription.payment.summary(today);
        let next_payment_date = subscription.next_payment_date();
        Self {
            subscription,
            payment_summary,
            next_payment_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResponse {
    #[serde(flatten)]
    pub training: TrainingEnrollment,
    pub payment_summary: PaymentSummary,
}

impl TrainingResponse {
    pub fn new(mut training: TrainingEnrollment, today: NaiveDate) -> Self {
        training.payment.refresh_overdue(today);
        let payment_summary = training.payment.summary(today);
        Self {
            training,
            payment_summary,
        }
    }
}

/// A page of results as returned by list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub limit: u32,
    pub offset: u32,
}
