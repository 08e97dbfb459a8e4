//! Enrollment Domain Ports
//!
//! Repository traits for users, subscriptions and training enrollments.
//! Handlers depend on `Arc<dyn UserPort>` and friends; the adapters in
//! [`crate::memory`] are the only implementation today.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_enrollment::ports::{SubscriptionPort, SubscriptionQuery};
//!
//! let overdue = subscriptions
//!     .find_subscriptions(SubscriptionQuery::for_user(user_id).paginate(20, 0), None)
//!     .await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use core_kernel::{
    DomainPort, HealthCheckable, NotificationId, OperationMetadata, PortError, SubscriptionId,
    TrainingId, UserId,
};
use domain_payment::PaymentStatus;

use crate::notification::Notification;
use crate::subscription::{Subscription, SubscriptionStatus};
use crate::training::{TrainingEnrollment, TrainingStatus};
use crate::user::{User, UserRole, UserStatus};

/// Page size used when a query sets no limit
pub const DEFAULT_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of matches before pagination
    pub total: usize,
    pub limit: u32,
    pub offset: u32,
}

impl<T> Page<T> {
    /// Cuts one page out of an already filtered and sorted list
    pub fn slice(items: Vec<T>, limit: Option<u32>, offset: Option<u32>) -> Self {
        let total = items.len();
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        let offset = offset.unwrap_or(0);
        let items = items
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Self {
            items,
            total,
            limit,
            offset,
        }
    }

    pub fn has_more(&self) -> bool {
        (self.offset as usize + self.items.len()) < self.total
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortKey {
    Name,
    Email,
    JoinDate,
    LastLogin,
}

/// Query parameters for finding users
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    /// Case-insensitive match on name or email
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub sort: Option<UserSortKey>,
    pub direction: SortDirection,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl UserQuery {
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, user: &User) -> bool {
        if let Some(ref text) = self.search {
            let text = text.to_lowercase();
            if !contains_ci(&user.name, &text) && !contains_ci(&user.email, &text) {
                return false;
            }
        }
        if let Some(role) = self.role {
            if user.role != role {
                return false;
            }
        }
        if let Some(status) = self.status {
            if user.status != status {
                return false;
            }
        }
        true
    }

    /// Orders by the sort key, falling back to creation order
    pub fn compare(&self, a: &User, b: &User) -> Ordering {
        let ordering = match self.sort {
            Some(UserSortKey::Name) => cmp_ci(&a.name, &b.name),
            Some(UserSortKey::Email) => a.email.cmp(&b.email),
            Some(UserSortKey::JoinDate) => a.join_date.cmp(&b.join_date),
            Some(UserSortKey::LastLogin) => a.last_login.cmp(&b.last_login),
            None => Ordering::Equal,
        };
        self.direction.apply(ordering.then_with(|| a.id.cmp(&b.id)))
    }
}

#[async_trait]
pub trait UserPort: DomainPort + HealthCheckable {
    /// Stores a new user; `Conflict` if the id or email is taken
    async fn create_user(&self, user: User, metadata: Option<OperationMetadata>) -> Result<User, PortError>;

    async fn get_user(&self, id: UserId, metadata: Option<OperationMetadata>) -> Result<User, PortError>;

    async fn find_users(&self, query: UserQuery, metadata: Option<OperationMetadata>) -> Result<Page<User>, PortError>;

    /// Replaces a stored user; `NotFound` if it does not exist
    async fn update_user(&self, user: User, metadata: Option<OperationMetadata>) -> Result<User, PortError>;

    async fn delete_user(&self, id: UserId, metadata: Option<OperationMetadata>) -> Result<(), PortError>;
}

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSortKey {
    UserName,
    CourseName,
    BatchDate,
    TotalAmount,
    PaymentProgress,
}

/// Query parameters for finding subscriptions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubscriptionQuery {
    pub user_id: Option<UserId>,
    pub status: Option<SubscriptionStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive match on user name, course, platform or batch
    pub search: Option<String>,
    pub sort: Option<SubscriptionSortKey>,
    pub direction: SortDirection,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl SubscriptionQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    /// Every match, no pagination
    pub fn all_for_user(user_id: UserId) -> Self {
        Self::for_user(user_id).paginate(u32::MAX, 0)
    }

    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, sub: &Subscription) -> bool {
        if let Some(user_id) = self.user_id {
            if sub.user_id != user_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if sub.status != status {
                return false;
            }
        }
        if let Some(payment_status) = self.payment_status {
            if sub.payment.compute_status() != payment_status {
                return false;
            }
        }
        if let Some(ref text) = self.search {
            let text = text.to_lowercase();
            let hit = [&sub.user_name, &sub.course_name, &sub.platform, &sub.batch_number]
                .iter()
                .any(|field| contains_ci(field, &text));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn compare(&self, a: &Subscription, b: &Subscription) -> Ordering {
        let ordering = match self.sort {
            Some(SubscriptionSortKey::UserName) => cmp_ci(&a.user_name, &b.user_name),
            Some(SubscriptionSortKey::CourseName) => cmp_ci(&a.course_name, &b.course_name),
            Some(SubscriptionSortKey::BatchDate) => a.batch_date.cmp(&b.batch_date),
            Some(SubscriptionSortKey::TotalAmount) => {
                a.payment.total_amount.amount().cmp(&b.payment.total_amount.amount())
            }
            Some(SubscriptionSortKey::PaymentProgress) => {
                a.payment.compute_progress().cmp(&b.payment.compute_progress())
            }
            None => Ordering::Equal,
        };
        self.direction.apply(ordering.then_with(|| a.id.cmp(&b.id)))
    }
}

#[async_trait]
pub trait SubscriptionPort: DomainPort + HealthCheckable {
    async fn create_subscription(
        &self,
        subscription: Subscription,
        metadata: Option<OperationMetadata>,
    ) -> Result<Subscription, PortError>;

    async fn get_subscription(
        &self,
        id: SubscriptionId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Subscription, PortError>;

    async fn find_subscriptions(
        &self,
        query: SubscriptionQuery,
        metadata: Option<OperationMetadata>,
    ) -> Result<Page<Subscription>, PortError>;

    /// Replaces a stored subscription; last writer wins
    async fn update_subscription(
        &self,
        subscription: Subscription,
        metadata: Option<OperationMetadata>,
    ) -> Result<Subscription, PortError>;

    async fn delete_subscription(
        &self,
        id: SubscriptionId,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}

// ============================================================================
// Trainings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingSortKey {
    UserName,
    Program,
    StartDate,
    EndDate,
    Progress,
}

/// Query parameters for finding training enrollments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingQuery {
    pub user_id: Option<UserId>,
    pub status: Option<TrainingStatus>,
    pub payment_status: Option<PaymentStatus>,
    /// Case-insensitive match on user name, program, provider or instructor
    pub search: Option<String>,
    pub sort: Option<TrainingSortKey>,
    pub direction: SortDirection,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl TrainingQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn all_for_user(user_id: UserId) -> Self {
        Self::for_user(user_id).paginate(u32::MAX, 0)
    }

    pub fn paginate(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn matches(&self, training: &TrainingEnrollment) -> bool {
        if let Some(user_id) = self.user_id {
            if training.user_id != user_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if training.status != status {
                return false;
            }
        }
        if let Some(payment_status) = self.payment_status {
            if training.payment.compute_status() != payment_status {
                return false;
            }
        }
        if let Some(ref text) = self.search {
            let text = text.to_lowercase();
            let hit = [&training.user_name, &training.program, &training.provider, &training.instructor]
                .iter()
                .any(|field| contains_ci(field, &text));
            if !hit {
                return false;
            }
        }
        true
    }

    pub fn compare(&self, a: &TrainingEnrollment, b: &TrainingEnrollment) -> Ordering {
        let ordering = match self.sort {
            Some(TrainingSortKey::UserName) => cmp_ci(&a.user_name, &b.user_name),
            Some(TrainingSortKey::Program) => cmp_ci(&a.program, &b.program),
            Some(TrainingSortKey::StartDate) => a.start_date.cmp(&b.start_date),
            Some(TrainingSortKey::EndDate) => a.end_date.cmp(&b.end_date),
            Some(TrainingSortKey::Progress) => a.progress.cmp(&b.progress),
            None => Ordering::Equal,
        };
        self.direction.apply(ordering.then_with(|| a.id.cmp(&b.id)))
    }
}

#[async_trait]
pub trait TrainingPort: DomainPort + HealthCheckable {
    async fn create_training(
        &self,
        training: TrainingEnrollment,
        metadata: Option<OperationMetadata>,
    ) -> Result<TrainingEnrollment, PortError>;

    async fn get_training(
        &self,
        id: TrainingId,
        metadata: Option<OperationMetadata>,
    ) -> Result<TrainingEnrollment, PortError>;

    async fn find_trainings(
        &self,
        query: TrainingQuery,
        metadata: Option<OperationMetadata>,
    ) -> Result<Page<TrainingEnrollment>, PortError>;

    async fn update_training(
        &self,
        training: TrainingEnrollment,
        metadata: Option<OperationMetadata>,
    ) -> Result<TrainingEnrollment, PortError>;

    async fn delete_training(
        &self,
        id: TrainingId,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;
}

// ============================================================================
// Notifications
// ============================================================================

/// Query parameters for a user's notification feed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationQuery {
    pub user_id: Option<UserId>,
    pub unread_only: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl NotificationQuery {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, notification: &Notification) -> bool {
        if self.user_id.is_some_and(|id| notification.user_id != id) {
            return false;
        }
        !(self.unread_only && notification.read)
    }
}

#[async_trait]
pub trait NotificationPort: DomainPort + HealthCheckable {
    async fn create_notification(
        &self,
        notification: Notification,
        metadata: Option<OperationMetadata>,
    ) -> Result<Notification, PortError>;

    async fn get_notification(
        &self,
        id: NotificationId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Notification, PortError>;

    /// Newest first
    async fn find_notifications(
        &self,
        query: NotificationQuery,
        metadata: Option<OperationMetadata>,
    ) -> Result<Page<Notification>, PortError>;

    async fn unread_count(&self, user_id: UserId, metadata: Option<OperationMetadata>) -> Result<usize, PortError>;

    async fn mark_read(
        &self,
        id: NotificationId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Notification, PortError>;

    /// Marks every notification of the user read; returns how many changed
    async fn mark_all_read(&self, user_id: UserId, metadata: Option<OperationMetadata>) -> Result<usize, PortError>;

    async fn delete_notification(
        &self,
        id: NotificationId,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError>;

    /// Removes a user's whole feed; returns how many were removed
    async fn delete_for_user(&self, user_id: UserId, metadata: Option<OperationMetadata>) -> Result<usize, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_slice() {
        let page = Page::slice((1..=10).collect::<Vec<_>>(), Some(3), Some(6));
        assert_eq!(page.items, vec![7, 8, 9]);
        assert_eq!(page.total, 10);
        assert!(page.has_more());

        let last = Page::slice((1..=10).collect::<Vec<_>>(), Some(3), Some(9));
        assert_eq!(last.items, vec![10]);
        assert!(!last.has_more());
    }

    #[test]
    fn test_page_defaults() {
        let page = Page::slice(vec![1, 2], None, None);
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_query_deserializes_from_flat_params() {
        let query: SubscriptionQuery = serde_json::from_value(serde_json::json!({
            "status": "active",
            "payment_status": "partial",
            "sort": "batch_date",
            "direction": "desc"
        }))
        .unwrap();
        assert_eq!(query.status, Some(SubscriptionStatus::Active));
        assert_eq!(query.payment_status, Some(PaymentStatus::Partial));
        assert_eq!(query.sort, Some(SubscriptionSortKey::BatchDate));
        assert_eq!(query.direction, SortDirection::Desc);
    }
}
