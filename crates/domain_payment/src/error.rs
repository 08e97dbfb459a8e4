//! Payment ledger errors

use thiserror::Error;

use core_kernel::{InstallmentId, MoneyError};

/// Errors raised by payment ledger operations
///
/// All of them are synchronous and final: nothing here performs I/O, so
/// there is no transient failure to retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Malformed input such as a non-positive amount or an empty plan
    #[error("Validation error: {0}")]
    Validation(String),

    /// The operation would break a structural invariant of the record
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Installment not found: {0}")]
    InstallmentNotFound(InstallmentId),

    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl PaymentError {
    pub fn validation(message: impl Into<String>) -> Self {
        PaymentError::Validation(message.into())
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        PaymentError::InvariantViolation(message.into())
    }

    /// True for errors caused by malformed input
    pub fn is_validation(&self) -> bool {
        matches!(self, PaymentError::Validation(_) | PaymentError::Money(_))
    }
}
