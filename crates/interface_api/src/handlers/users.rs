//! User handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::UserId;
use domain_enrollment::{NotificationPreferences, SubscriptionQuery, TrainingQuery, User, UserQuery};

use crate::auth::Claims;
use crate::dto::enrollment::ListResponse;
use crate::dto::users::*;
use crate::handlers::{metadata, parse_id};
use crate::{AppState, error::ApiError};

/// Lists users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ListResponse<User>>, ApiError> {
    claims.ensure_admin()?;
    let page = state.users.find_users(query, metadata(&claims)).await?;
    Ok(Json(ListResponse {
        items: page.items,
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Creates a user
pub async fn create_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    request.validate()?;
    let join_date = request.join_date.unwrap_or_else(|| state.today());
    let user = User::new(request.name, request.email, request.role, join_date)?;

    let user = state.users.create_user(user, metadata(&claims)).await?;
    info!(user_id = %user.id, role = %user.role, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Gets a user by ID
pub async fn get_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    claims.ensure_can_access(id)?;
    Ok(Json(state.users.get_user(id, metadata(&claims)).await?))
}

/// Updates a user
///
/// A name change is copied onto the user's subscriptions and trainings.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    request.validate()?;

    let mut user = state.users.get_user(id, metadata(&claims)).await?;
    let previous_name = user.name.clone();
    user.update(request.into())?;
    let user = state.users.update_user(user, metadata(&claims)).await?;

    if user.name != previous_name {
        propagate_name(&state, &claims, &user).await?;
    }
    Ok(Json(user))
}

/// Gets a user's notification preferences
pub async fn get_preferences(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<NotificationPreferences>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    claims.ensure_can_access(id)?;
    Ok(Json(state.users.get_user(id, metadata(&claims)).await?.preferences))
}

/// Replaces a user's notification preferences
///
/// Fields left out of the body take their default value.
pub async fn update_preferences(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(preferences): Json<NotificationPreferences>,
) -> Result<Json<NotificationPreferences>, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    claims.ensure_can_access(id)?;

    let mut user = state.users.get_user(id, metadata(&claims)).await?;
    user.set_preferences(preferences);
    let user = state.users.update_user(user, metadata(&claims)).await?;
    info!(
        user_id = %id,
        payment_reminders = user.preferences.payment_reminders,
        training_reminders = user.preferences.training_reminders,
        "Notification preferences updated"
    );
    Ok(Json(user.preferences))
}

async fn propagate_name(state: &AppState, claims: &Claims, user: &User) -> Result<(), ApiError> {
    let subscriptions = state
        .subscriptions
        .find_subscriptions(SubscriptionQuery::all_for_user(user.id), metadata(claims))
        .await?;
    for mut sub in subscriptions.items {
        sub.user_name = user.name.clone();
        state.subscriptions.update_subscription(sub, metadata(claims)).await?;
    }

    let trainings = state
        .trainings
        .find_trainings(TrainingQuery::all_for_user(user.id), metadata(claims))
        .await?;
    for mut training in trainings.items {
        training.user_name = user.name.clone();
        state.trainings.update_training(training, metadata(claims)).await?;
    }
    Ok(())
}

/// Deletes a user together with their subscriptions, trainings and notifications
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: UserId = parse_id(&id, "user")?;
    // 404 before touching anything
    state.users.get_user(id, metadata(&claims)).await?;

    let subscriptions = state
        .subscriptions
        .find_subscriptions(SubscriptionQuery::all_for_user(id), metadata(&claims))
        .await?;
    for sub in &subscriptions.items {
        state.subscriptions.delete_subscription(sub.id, metadata(&claims)).await?;
    }
    let trainings = state
        .trainings
        .find_trainings(TrainingQuery::all_for_user(id), metadata(&claims))
        .await?;
    for training in &trainings.items {
        state.trainings.delete_training(training.id, metadata(&claims)).await?;
    }

    let notifications = state.notifications.delete_for_user(id, metadata(&claims)).await?;

    state.users.delete_user(id, metadata(&claims)).await?;
    info!(
        user_id = %id,
        subscriptions = subscriptions.items.len(),
        trainings = trainings.items.len(),
        notifications,
        "User deleted"
    );
    Ok(StatusCode::NO_CONTENT)
}
