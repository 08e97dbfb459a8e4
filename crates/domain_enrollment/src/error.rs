//! Enrollment domain errors

use thiserror::Error;

use core_kernel::{CoreError, TemporalError};
use domain_payment::PaymentError;

/// Errors that can occur in the enrollment domain
#[derive(Debug, Error)]
pub enum EnrollmentError {
    /// Invalid field values on a user, subscription or training
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lifecycle status change not permitted from the current status
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EnrollmentError {
    pub fn validation(message: impl Into<String>) -> Self {
        EnrollmentError::Validation(message.into())
    }

    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        EnrollmentError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for EnrollmentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EnrollmentError::Validation(errors.to_string())
    }
}

impl From<TemporalError> for EnrollmentError {
    fn from(error: TemporalError) -> Self {
        EnrollmentError::Validation(error.to_string())
    }
}
