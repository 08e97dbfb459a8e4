//! In-memory adapters
//!
//! Each store keeps one collection behind a `tokio::sync::RwLock`. Reads
//! clone out of the map, writes replace whole entities, and the last writer
//! wins.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, NotificationId, OperationMetadata, PortError,
    SubscriptionId, TrainingId, UserId,
};

use crate::notification::Notification;
use crate::ports::{
    NotificationPort, NotificationQuery, Page, SubscriptionPort, SubscriptionQuery, TrainingPort,
    TrainingQuery, UserPort, UserQuery,
};
use crate::subscription::Subscription;
use crate::training::TrainingEnrollment;
use crate::user::User;

fn health(adapter_id: &str, len: usize) -> HealthCheckResult {
    let mut result = HealthCheckResult::healthy(adapter_id);
    result.message = Some(format!("{} records", len));
    result
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store, replacing entries with the same id
    pub async fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        {
            let mut map = store.users.write().await;
            for user in users {
                map.insert(user.id, user);
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn email_taken(users: &HashMap<UserId, User>, email: &str, except: UserId) -> bool {
    users
        .values()
        .any(|u| u.id != except && u.email.eq_ignore_ascii_case(email))
}

impl DomainPort for InMemoryUserStore {}

#[async_trait]
impl HealthCheckable for InMemoryUserStore {
    async fn health_check(&self) -> HealthCheckResult {
        health("memory-users", self.len().await)
    }
}

#[async_trait]
impl UserPort for InMemoryUserStore {
    async fn create_user(&self, user: User, _metadata: Option<OperationMetadata>) -> Result<User, PortError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(PortError::conflict(format!("User {} already exists", user.id)));
        }
        if email_taken(&users, &user.email, user.id) {
            return Err(PortError::conflict(format!("Email {} is already registered", user.email)));
        }
        debug!(user_id = %user.id, "User stored");
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId, _metadata: Option<OperationMetadata>) -> Result<User, PortError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("User", id))
    }

    async fn find_users(&self, query: UserQuery, _metadata: Option<OperationMetadata>) -> Result<Page<User>, PortError> {
        let users = self.users.read().await;
        let mut results: Vec<User> = users.values().filter(|u| query.matches(u)).cloned().collect();
        results.sort_by(|a, b| query.compare(a, b));
        Ok(Page::slice(results, query.limit, query.offset))
    }

    async fn update_user(&self, user: User, _metadata: Option<OperationMetadata>) -> Result<User, PortError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(PortError::not_found("User", user.id));
        }
        if email_taken(&users, &user.email, user.id) {
            return Err(PortError::conflict(format!("Email {} is already registered", user.email)));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: UserId, _metadata: Option<OperationMetadata>) -> Result<(), PortError> {
        self.users
            .write()
            .await
            .remove(&id)
            .map(|_| debug!(user_id = %id, "User removed"))
            .ok_or_else(|| PortError::not_found("User", id))
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemorySubscriptionStore {
    subscriptions: Arc<RwLock<HashMap<SubscriptionId, Subscription>>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_subscriptions(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        let store = Self::new();
        {
            let mut map = store.subscriptions.write().await;
            for sub in subscriptions {
                map.insert(sub.id, sub);
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subscriptions.read().await.is_empty()
    }
}

impl DomainPort for InMemorySubscriptionStore {}

#[async_trait]
impl HealthCheckable for InMemorySubscriptionStore {
    async fn health_check(&self) -> HealthCheckResult {
        health("memory-subscriptions", self.len().await)
    }
}

#[async_trait]
impl SubscriptionPort for InMemorySubscriptionStore {
    async fn create_subscription(
        &self,
        subscription: Subscription,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Subscription, PortError> {
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.contains_key(&subscription.id) {
            return Err(PortError::conflict(format!(
                "Subscription {} already exists",
                subscription.id
            )));
        }
        debug!(subscription_id = %subscription.id, "Subscription stored");
        subscriptions.insert(subscription.id, subscription.clone());
        Ok(subscription)
    }

    async fn get_subscription(
        &self,
        id: SubscriptionId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Subscription, PortError> {
        self.subscriptions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Subscription", id))
    }

    async fn find_subscriptions(
        &self,
        query: SubscriptionQuery,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Page<Subscription>, PortError> {
        let subscriptions = self.subscriptions.read().await;
        let mut results: Vec<Subscription> = subscriptions
            .values()
            .filter(|s| query.matches(s))
            .cloned()
            .collect();
        results.sort_by(|a, b| query.compare(a, b));
        Ok(Page::slice(results, query.limit, query.offset))
    }

    async fn update_subscription(
        &self,
        subscription: Subscription,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Subscription, PortError> {
        let mut subscriptions = self.subscriptions.write().await;
        match subscriptions.get_mut(&subscription.id) {
            Some(stored) => {
                *stored = subscription.clone();
                Ok(subscription)
            }
            None => Err(PortError::not_found("Subscription", subscription.id)),
        }
    }

    async fn delete_subscription(
        &self,
        id: SubscriptionId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.subscriptions
            .write()
            .await
            .remove(&id)
            .map(|_| debug!(subscription_id = %id, "Subscription removed"))
            .ok_or_else(|| PortError::not_found("Subscription", id))
    }
}

// ============================================================================
// Trainings
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryTrainingStore {
    trainings: Arc<RwLock<HashMap<TrainingId, TrainingEnrollment>>>,
}

impl InMemoryTrainingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_trainings(trainings: impl IntoIterator<Item = TrainingEnrollment>) -> Self {
        let store = Self::new();
        {
            let mut map = store.trainings.write().await;
            for training in trainings {
                map.insert(training.id, training);
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.trainings.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trainings.read().await.is_empty()
    }
}

impl DomainPort for InMemoryTrainingStore {}

#[async_trait]
impl HealthCheckable for InMemoryTrainingStore {
    async fn health_check(&self) -> HealthCheckResult {
        health("memory-trainings", self.len().await)
    }
}

#[async_trait]
impl TrainingPort for InMemoryTrainingStore {
    async fn create_training(
        &self,
        training: TrainingEnrollment,
        _metadata: Option<OperationMetadata>,
    ) -> Result<TrainingEnrollment, PortError> {
        let mut trainings = self.trainings.write().await;
        if trainings.contains_key(&training.id) {
            return Err(PortError::conflict(format!("Training {} already exists", training.id)));
        }
        debug!(training_id = %training.id, "Training stored");
        trainings.insert(training.id, training.clone());
        Ok(training)
    }

    async fn get_training(
        &self,
        id: TrainingId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<TrainingEnrollment, PortError> {
        self.trainings
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Training", id))
    }

    async fn find_trainings(
        &self,
        query: TrainingQuery,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Page<TrainingEnrollment>, PortError> {
        let trainings = self.trainings.read().await;
        let mut results: Vec<TrainingEnrollment> = trainings
            .values()
            .filter(|t| query.matches(t))
            .cloned()
            .collect();
        results.sort_by(|a, b| query.compare(a, b));
        Ok(Page::slice(results, query.limit, query.offset))
    }

    async fn update_training(
        &self,
        training: TrainingEnrollment,
        _metadata: Option<OperationMetadata>,
    ) -> Result<TrainingEnrollment, PortError> {
        let mut trainings = self.trainings.write().await;
        match trainings.get_mut(&training.id) {
            Some(stored) => {
                *stored = training.clone();
                Ok(training)
            }
            None => Err(PortError::not_found("Training", training.id)),
        }
    }

    async fn delete_training(
        &self,
        id: TrainingId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.trainings
            .write()
            .await
            .remove(&id)
            .map(|_| debug!(training_id = %id, "Training removed"))
            .ok_or_else(|| PortError::not_found("Training", id))
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<HashMap<NotificationId, Notification>>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_notifications(notifications: impl IntoIterator<Item = Notification>) -> Self {
        let store = Self::new();
        {
            let mut map = store.notifications.write().await;
            for notification in notifications {
                map.insert(notification.id, notification);
            }
        }
        store
    }

    pub async fn len(&self) -> usize {
        self.notifications.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notifications.read().await.is_empty()
    }
}

impl DomainPort for InMemoryNotificationStore {}

#[async_trait]
impl HealthCheckable for InMemoryNotificationStore {
    async fn health_check(&self) -> HealthCheckResult {
        health("memory-notifications", self.len().await)
    }
}

#[async_trait]
impl NotificationPort for InMemoryNotificationStore {
    async fn create_notification(
        &self,
        notification: Notification,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Notification, PortError> {
        let mut notifications = self.notifications.write().await;
        if notifications.contains_key(&notification.id) {
            return Err(PortError::conflict(format!(
                "Notification {} already exists",
                notification.id
            )));
        }
        notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn get_notification(
        &self,
        id: NotificationId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Notification, PortError> {
        self.notifications
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Notification", id))
    }

    async fn find_notifications(
        &self,
        query: NotificationQuery,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Page<Notification>, PortError> {
        let notifications = self.notifications.read().await;
        let mut results: Vec<Notification> = notifications
            .values()
            .filter(|n| query.matches(n))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(Page::slice(results, query.limit, query.offset))
    }

    async fn unread_count(&self, user_id: UserId, _metadata: Option<OperationMetadata>) -> Result<usize, PortError> {
        Ok(self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.user_id == user_id && !n.read)
            .count())
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Notification, PortError> {
        let mut notifications = self.notifications.write().await;
        let notification = notifications
            .get_mut(&id)
            .ok_or_else(|| PortError::not_found("Notification", id))?;
        notification.mark_read();
        Ok(notification.clone())
    }

    async fn mark_all_read(&self, user_id: UserId, _metadata: Option<OperationMetadata>) -> Result<usize, PortError> {
        let mut notifications = self.notifications.write().await;
        let changed = notifications
            .values_mut()
            .filter(|n| n.user_id == user_id)
            .map(Notification::mark_read)
            .filter(|was_unread| *was_unread)
            .count();
        debug!(user_id = %user_id, changed, "Notifications marked read");
        Ok(changed)
    }

    async fn delete_notification(
        &self,
        id: NotificationId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        self.notifications
            .write()
            .await
            .remove(&id)
            .map(|_| debug!(notification_id = %id, "Notification removed"))
            .ok_or_else(|| PortError::not_found("Notification", id))
    }

    async fn delete_for_user(&self, user_id: UserId, _metadata: Option<OperationMetadata>) -> Result<usize, PortError> {
        let mut notifications = self.notifications.write().await;
        let before = notifications.len();
        notifications.retain(|_, n| n.user_id != user_id);
        Ok(before - notifications.len())
    }
}
