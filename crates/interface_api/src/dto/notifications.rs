//! Notification feed DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::UserId;
use domain_enrollment::{Notification, NotificationKind};

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateNotificationRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub kind: NotificationKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    #[validate(length(min = 1, max = 500))]
    pub action_url: Option<String>,
}

/// A page of the feed plus the owner's unread count
#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub total: usize,
    pub unread_count: usize,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MarkAllReadResponse {
    pub updated: usize,
}
