//! Request handlers

pub mod health;
pub mod users;
pub mod subscriptions;
pub mod trainings;
pub mod payments;
pub mod reports;
pub mod notifications;

use std::str::FromStr;

use core_kernel::OperationMetadata;

use crate::auth::Claims;
use crate::error::ApiError;

/// Parses a path id, accepting both the prefixed and the bare uuid form
pub(crate) fn parse_id<T: FromStr>(raw: &str, entity: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} id: {}", entity, raw)))
}

/// Port metadata naming the caller
pub(crate) fn metadata(claims: &Claims) -> Option<OperationMetadata> {
    Some(OperationMetadata::default().initiated_by(claims.sub.clone()))
}
