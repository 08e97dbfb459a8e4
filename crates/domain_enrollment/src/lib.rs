//! Enrollment Domain - Users, Subscriptions and Training
//!
//! The records an academy administrator manages:
//! - **Users**: learners and administrators
//! - **Subscriptions**: a user's seat in a batch of an online course
//! - **Training enrollments**: instructor-led programs with a lifecycle of
//!   `upcoming -> in-progress -> completed`
//!
//! - **Notifications**: per-user preferences and an in-app feed
//!
//! Subscriptions and trainings each embed one `domain_payment::PaymentRecord`.
//! Storage goes through the ports in [`ports`]; [`memory`] provides the
//! in-process adapters.

pub mod user;
pub mod subscription;
pub mod training;
pub mod stats;
pub mod notification;
pub mod ports;
pub mod memory;
pub mod error;

pub use user::{User, UserRole, UserStatus, UserUpdate};
pub use subscription::{Subscription, SubscriptionDetails, SubscriptionStatus, SubscriptionUpdate};
pub use training::{TrainingDetails, TrainingEnrollment, TrainingStatus, TrainingUpdate};
pub use stats::{AdminStats, CurrencyTotals, PaymentStats};
pub use notification::{Notification, NotificationKind, NotificationPreferences};
pub use ports::{
    NotificationPort, NotificationQuery, Page, SortDirection, SubscriptionPort, SubscriptionQuery,
    SubscriptionSortKey, TrainingPort, TrainingQuery, TrainingSortKey, UserPort, UserQuery,
    UserSortKey,
};
pub use memory::{
    InMemoryNotificationStore, InMemorySubscriptionStore, InMemoryTrainingStore, InMemoryUserStore,
};
pub use error::EnrollmentError;
