//! Subscription handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::{SubscriptionId, UserId};
use domain_enrollment::{Subscription, SubscriptionQuery, SubscriptionUpdate, User};

use crate::auth::Claims;
use crate::dto::enrollment::*;
use crate::handlers::{metadata, parse_id};
use crate::{AppState, error::ApiError};

/// Resolves the user a request body refers to
pub(crate) async fn load_owner(state: &AppState, claims: &Claims, user_id: UserId) -> Result<User, ApiError> {
    match state.users.get_user(user_id, metadata(claims)).await {
        Ok(user) => Ok(user),
        Err(e) if e.is_not_found() => Err(ApiError::Validation(format!("Unknown user {}", user_id))),
        Err(e) => Err(e.into()),
    }
}

/// Loads a subscription the caller is allowed to see
pub(crate) async fn load_subscription(
    state: &AppState,
    claims: &Claims,
    id: &str,
) -> Result<Subscription, ApiError> {
    let id: SubscriptionId = parse_id(id, "subscription")?;
    let subscription = state.subscriptions.get_subscription(id, metadata(claims)).await?;
    claims.ensure_can_access(subscription.user_id)?;
    Ok(subscription)
}

/// Lists subscriptions
///
/// Non-admin callers only ever see their own.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(mut query): Query<SubscriptionQuery>,
) -> Result<Json<ListResponse<SubscriptionResponse>>, ApiError> {
    if !claims.is_admin() {
        let own = claims
            .user_id()
            .ok_or_else(|| ApiError::Forbidden("Token does not name a user".to_string()))?;
        query.user_id = Some(own);
    }

    let today = state.today();
    let page = state.subscriptions.find_subscriptions(query, metadata(&claims)).await?;
    Ok(Json(ListResponse {
        items: page
            .items
            .into_iter()
            .map(|s| SubscriptionResponse::new(s, today))
            .collect(),
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Creates a subscription with its payment plan
pub async fn create_subscription(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), ApiError> {
    request.validate()?;
    let owner = load_owner(&state, &claims, request.user_id).await?;
    let (details, plan) = request.into_parts(&owner);
    let subscription = Subscription::new(details, plan.into_record()?)?;

    let subscription = state
        .subscriptions
        .create_subscription(subscription, metadata(&claims))
        .await?;
    info!(
        subscription_id = %subscription.id,
        user_id = %subscription.user_id,
        total = %subscription.payment.total_amount,
        "Subscription created"
    );
    Ok((StatusCode::CREATED, Json(SubscriptionResponse::new(subscription, state.today()))))
}

/// Gets a subscription by ID
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    let subscription = load_subscription(&state, &claims, &id).await?;
    Ok(Json(SubscriptionResponse::new(subscription, state.today())))
}

/// Replaces a subscription's details and, when given, its payment plan
pub async fn update_subscription(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<Json<SubscriptionResponse>, ApiError> {
    request.validate()?;
    let mut subscription = load_subscription(&state, &claims, &id).await?;
    let owner = load_owner(&state, &claims, request.user_id).await?;

    let (details, plan) = request.into_parts(&owner);
    let payment = plan.map(|p| p.into_record()).transpose()?;
    subscription.update(SubscriptionUpdate { details, payment })?;

    let subscription = state
        .subscriptions
        .update_subscription(subscription, metadata(&claims))
        .await?;
    info!(subscription_id = %subscription.id, "Subscription updated");
    Ok(Json(SubscriptionResponse::new(subscription, state.today())))
}

/// Deletes a subscription
pub async fn delete_subscription(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: SubscriptionId = parse_id(&id, "subscription")?;
    state.subscriptions.delete_subscription(id, metadata(&claims)).await?;
    info!(subscription_id = %id, "Subscription deleted");
    Ok(StatusCode::NO_CONTENT)
}
