//! Platform users
//!
//! Users are the learners (and administrators) that subscriptions and
//! training enrollments are attached to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::UserId;
use crate::error::EnrollmentError;
use crate::notification::NotificationPreferences;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::User => f.write_str("user"),
            UserRole::Admin => f.write_str("admin"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: UserId,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub join_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<NaiveDate>,
    #[serde(default)]
    pub preferences: NotificationPreferences,
}

/// Editable fields of a user; applied as a full replace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
}

impl User {
    /// Creates an active user who joined on `join_date`
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
        join_date: NaiveDate,
    ) -> Result<Self, EnrollmentError> {
        let user = Self {
            id: UserId::new_v7(),
            name: name.into().trim().to_string(),
            email: normalize_email(email.into()),
            role,
            status: UserStatus::Active,
            join_date,
            last_login: None,
            preferences: NotificationPreferences::default(),
        };
        user.validate()?;
        Ok(user)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Initials shown in place of an avatar, e.g. "JD" for "John Doe"
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Replaces the editable fields; leaves the user untouched on error
    pub fn update(&mut self, update: UserUpdate) -> Result<(), EnrollmentError> {
        let candidate = Self {
            name: update.name.trim().to_string(),
            email: normalize_email(update.email),
            role: update.role,
            status: update.status,
            ..self.clone()
        };
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// Whether installment reminders should be shown to this user
    pub fn wants_payment_reminders(&self) -> bool {
        self.preferences.payment_reminders
    }

    pub fn set_preferences(&mut self, preferences: NotificationPreferences) {
        self.preferences = preferences;
    }

    pub fn record_login(&mut self, date: NaiveDate) {
        self.last_login = Some(date);
    }

    pub fn deactivate(&mut self) {
        self.status = UserStatus::Inactive;
    }

    pub fn activate(&mut self) {
        self.status = UserStatus::Active;
    }
}

fn normalize_email(email: String) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_user_is_active() {
        let user = User::new("John Doe", "John.Doe@ProtectedConsulting.com", UserRole::User, date(2023, 6, 15)).unwrap();
        assert!(user.is_active());
        assert!(!user.is_admin());
        assert_eq!(user.email, "john.doe@protectedconsulting.com");
        assert_eq!(user.initials(), "JD");
    }

    #[test]
    fn test_rejects_invalid_email() {
        let result = User::new("John Doe", "not-an-email", UserRole::User, date(2023, 6, 15));
        assert!(matches!(result, Err(EnrollmentError::Validation(_))));
    }

    #[test]
    fn test_rejects_blank_name() {
        let result = User::new("   ", "a@b.com", UserRole::User, date(2023, 6, 15));
        assert!(matches!(result, Err(EnrollmentError::Validation(_))));
    }

    #[test]
    fn test_failed_update_leaves_user_unchanged() {
        let mut user = User::new("Jane Smith", "jane@example.com", UserRole::User, date(2023, 8, 22)).unwrap();
        let before = user.clone();
        let result = user.update(UserUpdate {
            name: "Jane Smith".to_string(),
            email: "broken".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Inactive,
        });
        assert!(result.is_err());
        assert_eq!(user, before);
    }

    #[test]
    fn test_update_and_login() {
        let mut user = User::new("Mike Johnson", "mike@example.com", UserRole::User, date(2023, 4, 10)).unwrap();
        user.update(UserUpdate {
            name: "Mike Johnson".to_string(),
            email: "mike.johnson@example.com".to_string(),
            role: UserRole::Admin,
            status: UserStatus::Inactive,
        })
        .unwrap();
        user.record_login(date(2023, 12, 15));

        assert!(user.is_admin());
        assert!(!user.is_active());
        assert_eq!(user.last_login, Some(date(2023, 12, 15)));
    }

    #[test]
    fn test_preferences_survive_profile_update() {
        let mut user = User::new("Jane Smith", "jane@example.com", UserRole::User, date(2023, 8, 22)).unwrap();
        assert!(user.wants_payment_reminders());

        user.set_preferences(NotificationPreferences {
            payment_reminders: false,
            ..Default::default()
        });
        user.update(UserUpdate {
            name: "Jane Smith-Ali".to_string(),
            email: "jane@example.com".to_string(),
            role: UserRole::User,
            status: UserStatus::Active,
        })
        .unwrap();
        assert!(!user.wants_payment_reminders());
    }

    #[test]
    fn test_user_without_stored_preferences_gets_defaults() {
        let json = r#"{
            "id": "0190c6a4-8f9e-7c3d-b1a2-3e4f5a6b7c8d",
            "name": "John Doe",
            "email": "john@example.com",
            "role": "user",
            "status": "active",
            "join_date": "2023-06-15"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.preferences, NotificationPreferences::default());
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        let status: UserStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, UserStatus::Inactive);
    }
}
