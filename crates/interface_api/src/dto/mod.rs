//! Request and response bodies

pub mod users;
pub mod enrollment;
pub mod payment;
pub mod reports;
pub mod notifications;
