//! Notification preferences and the in-app notification feed
//!
//! Preferences are stored on each [`User`](crate::User). Delivery toggles are
//! kept for whatever sends mail or push messages; the topic toggles decide
//! what the reminders view shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use core_kernel::{NotificationId, UserId};
use crate::error::EnrollmentError;

/// What a user wants to be told about, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub in_app_notifications: bool,
    /// Installments due soon or overdue
    pub payment_reminders: bool,
    /// Course progress and subscriptions about to lapse
    pub course_updates: bool,
    /// Trainings about to start
    pub training_reminders: bool,
    pub certificate_alerts: bool,
    pub admin_alerts: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: true,
            in_app_notifications: true,
            payment_reminders: true,
            course_updates: true,
            training_reminders: true,
            certificate_alerts: true,
            admin_alerts: false,
        }
    }
}

/// Severity shown next to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Warning,
    Success,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
        };
        f.write_str(s)
    }
}

/// One entry in a user's notification feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
}

impl Notification {
    /// Creates an unread notification
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EnrollmentError> {
        let title = title.into().trim().to_string();
        let message = message.into().trim().to_string();
        if title.is_empty() {
            return Err(EnrollmentError::validation("title must not be empty"));
        }
        if message.is_empty() {
            return Err(EnrollmentError::validation("message must not be empty"));
        }

        let notification = Self {
            id: NotificationId::new_v7(),
            user_id,
            kind,
            title,
            message,
            created_at,
            read: false,
            action_url: None,
        };
        debug!(notification_id = %notification.id, user_id = %user_id, kind = %kind, "Notification created");
        Ok(notification)
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    /// Returns true if the notification was unread
    pub fn mark_read(&mut self) -> bool {
        !std::mem::replace(&mut self.read, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_default_preferences_leave_admin_alerts_off() {
        let prefs = NotificationPreferences::default();
        assert!(prefs.payment_reminders);
        assert!(prefs.training_reminders);
        assert!(!prefs.admin_alerts);
    }

    #[test]
    fn test_partial_preferences_fill_in_defaults() {
        let prefs: NotificationPreferences =
            serde_json::from_str(r#"{ "payment_reminders": false }"#).unwrap();
        assert!(!prefs.payment_reminders);
        assert!(prefs.course_updates);
        assert!(!prefs.admin_alerts);
    }

    #[test]
    fn test_new_notification_is_unread() {
        let mut notification = Notification::new(
            UserId::new(),
            NotificationKind::Warning,
            "Payment Due Soon",
            "Your Machine Learning Fundamentals payment is due in 5 days.",
            at(20),
        )
        .unwrap()
        .with_action_url("/dashboard");

        assert!(!notification.read);
        assert!(notification.mark_read());
        assert!(!notification.mark_read());
        assert_eq!(notification.action_url.as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_notification_requires_title_and_message() {
        assert!(Notification::new(UserId::new(), NotificationKind::Info, " ", "body", at(1)).is_err());
        assert!(Notification::new(UserId::new(), NotificationKind::Info, "Title", "", at(1)).is_err());
    }

    #[test]
    fn test_kind_serde() {
        assert_eq!(serde_json::to_string(&NotificationKind::Warning).unwrap(), "\"warning\"");
        let kind: NotificationKind = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(kind, NotificationKind::Error);
    }
}
