//! In-app notification feed handlers
//!
//! Admins post notifications to any user; each user reads, marks and
//! deletes entries in their own feed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use tracing::info;
use validator::Validate;

use core_kernel::{NotificationId, UserId};
use domain_enrollment::{Notification, NotificationQuery};

use crate::auth::Claims;
use crate::dto::notifications::*;
use crate::handlers::subscriptions::load_owner;
use crate::handlers::{metadata, parse_id};
use crate::{AppState, error::ApiError};

fn own_user_id(claims: &Claims) -> Result<UserId, ApiError> {
    claims
        .user_id()
        .ok_or_else(|| ApiError::Forbidden("Token does not name a user".to_string()))
}

/// Loads a notification from the caller's feed
async fn load_notification(state: &AppState, claims: &Claims, id: &str) -> Result<Notification, ApiError> {
    let id: NotificationId = parse_id(id, "notification")?;
    let notification = state.notifications.get_notification(id, metadata(claims)).await?;
    claims.ensure_can_access(notification.user_id)?;
    Ok(notification)
}

/// Lists a feed, newest first
///
/// Non-admins always get their own; admins may pass `user_id`.
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(mut query): Query<NotificationQuery>,
) -> Result<Json<NotificationListResponse>, ApiError> {
    let user_id = match query.user_id {
        Some(requested) => {
            claims.ensure_can_access(requested)?;
            requested
        }
        None => own_user_id(&claims)?,
    };
    query.user_id = Some(user_id);

    let page = state.notifications.find_notifications(query, metadata(&claims)).await?;
    let unread_count = state.notifications.unread_count(user_id, metadata(&claims)).await?;
    Ok(Json(NotificationListResponse {
        items: page.items,
        total: page.total,
        unread_count,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Posts a notification to a user's feed (admin only)
///
/// Stored regardless of the user's in-app toggle, which only governs display.
pub async fn create_notification(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    claims.ensure_admin()?;
    request.validate()?;
    let user = load_owner(&state, &claims, request.user_id).await?;

    let mut notification = Notification::new(user.id, request.kind, request.title, request.message, Utc::now())?;
    if let Some(url) = request.action_url {
        notification = notification.with_action_url(url);
    }
    let notification = state.notifications.create_notification(notification, metadata(&claims)).await?;
    info!(notification_id = %notification.id, user_id = %user.id, kind = %notification.kind, "Notification posted");
    Ok((StatusCode::CREATED, Json(notification)))
}

/// Marks one notification read
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
    let notification = load_notification(&state, &claims, &id).await?;
    Ok(Json(state.notifications.mark_read(notification.id, metadata(&claims)).await?))
}

/// Marks the caller's whole feed read
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<MarkAllReadResponse>, ApiError> {
    let user_id = own_user_id(&claims)?;
    let updated = state.notifications.mark_all_read(user_id, metadata(&claims)).await?;
    info!(user_id = %user_id, updated, "Notifications marked read");
    Ok(Json(MarkAllReadResponse { updated }))
}

pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let notification = load_notification(&state, &claims, &id).await?;
    state.notifications.delete_notification(notification.id, metadata(&claims)).await?;
    Ok(StatusCode::NO_CONTENT)
}
