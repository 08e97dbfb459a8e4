//! Dashboard statistics, data export and reminders

use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use chrono::Utc;
use tracing::info;

use core_kernel::{temporal::days_until, UserId};
use domain_enrollment::{
    AdminStats, NotificationPreferences, Subscription, SubscriptionQuery, TrainingEnrollment,
    TrainingQuery, TrainingStatus, User, UserQuery,
};
use domain_payment::reminders::due_soon;

use crate::auth::Claims;
use crate::dto::reports::*;
use crate::handlers::metadata;
use crate::{AppState, error::ApiError};

async fn all_users(state: &AppState, claims: &Claims) -> Result<Vec<User>, ApiError> {
    let query = UserQuery::default().paginate(u32::MAX, 0);
    Ok(state.users.find_users(query, metadata(claims)).await?.items)
}

async fn all_subscriptions(
    state: &AppState,
    claims: &Claims,
    query: SubscriptionQuery,
) -> Result<Vec<Subscription>, ApiError> {
    let query = query.paginate(u32::MAX, 0);
    Ok(state.subscriptions.find_subscriptions(query, metadata(claims)).await?.items)
}

async fn all_trainings(
    state: &AppState,
    claims: &Claims,
    query: TrainingQuery,
) -> Result<Vec<TrainingEnrollment>, ApiError> {
    let query = query.paginate(u32::MAX, 0);
    Ok(state.trainings.find_trainings(query, metadata(claims)).await?.items)
}

/// Dashboard counters and payment totals (admin only)
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AdminStats>, ApiError> {
    claims.ensure_admin()?;
    let users = all_users(&state, &claims).await?;
    let subscriptions = all_subscriptions(&state, &claims, SubscriptionQuery::default()).await?;
    let trainings = all_trainings(&state, &claims, TrainingQuery::default()).await?;

    Ok(Json(AdminStats::compute(&users, &subscriptions, &trainings, state.today())))
}

/// Dumps every user, subscription and training (admin only)
pub async fn export_data(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ExportResponse>, ApiError> {
    claims.ensure_admin()?;
    let export = ExportResponse {
        exported_at: Utc::now(),
        users: all_users(&state, &claims).await?,
        subscriptions: all_subscriptions(&state, &claims, SubscriptionQuery::default()).await?,
        trainings: all_trainings(&state, &claims, TrainingQuery::default()).await?,
    };
    info!(
        exported_by = %claims.sub,
        users = export.users.len(),
        subscriptions = export.subscriptions.len(),
        trainings = export.trainings.len(),
        "Data exported"
    );
    Ok(Json(export))
}

/// Preferences of every user the reminders may concern
async fn preferences_by_user(
    state: &AppState,
    claims: &Claims,
) -> Result<HashMap<UserId, NotificationPreferences>, ApiError> {
    if claims.is_admin() {
        let users = all_users(state, claims).await?;
        return Ok(users.into_iter().map(|u| (u.id, u.preferences)).collect());
    }
    let mut prefs = HashMap::new();
    if let Some(own) = claims.user_id() {
        match state.users.get_user(own, metadata(claims)).await {
            Ok(user) => {
                prefs.insert(own, user.preferences);
            }
            // Owners missing from the store get the defaults
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(prefs)
}

/// Installments due soon or overdue, subscriptions about to lapse and
/// trainings about to start
///
/// Admins get everyone's; other users their own. Each list only carries
/// records whose owner has the matching reminder switched on.
pub async fn get_reminders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<RemindersResponse>, ApiError> {
    let (subscription_query, training_query) = if claims.is_admin() {
        (SubscriptionQuery::default(), TrainingQuery::default())
    } else {
        let own = claims
            .user_id()
            .ok_or_else(|| ApiError::Forbidden("Token does not name a user".to_string()))?;
        (SubscriptionQuery::for_user(own), TrainingQuery::for_user(own))
    };

    let today = state.today();
    let window = state.config.reminder_window_days;
    let subscriptions = all_subscriptions(&state, &claims, subscription_query).await?;
    let trainings = all_trainings(&state, &claims, training_query).await?;

    let preferences = preferences_by_user(&state, &claims).await?;
    let prefs_of = |user_id: UserId| preferences.get(&user_id).copied().unwrap_or_default();

    let mut payments = Vec::new();
    for sub in subscriptions.iter().filter(|s| prefs_of(s.user_id).payment_reminders) {
        payments.extend(due_soon(&sub.payment, today, window).into_iter().map(|reminder| ReminderEntry {
            owner: PaymentOwnerKind::Subscription,
            owner_id: sub.id.to_string(),
            user_id: sub.user_id,
            user_name: sub.user_name.clone(),
            title: sub.course_name.clone(),
            reminder,
        }));
    }
    for training in trainings.iter().filter(|t| prefs_of(t.user_id).payment_reminders) {
        payments.extend(due_soon(&training.payment, today, window).into_iter().map(|reminder| ReminderEntry {
            owner: PaymentOwnerKind::Training,
            owner_id: training.id.to_string(),
            user_id: training.user_id,
            user_name: training.user_name.clone(),
            title: training.program.clone(),
            reminder,
        }));
    }
    payments.sort_by(|a, b| {
        a.reminder
            .due_date
            .cmp(&b.reminder.due_date)
            .then_with(|| a.owner_id.cmp(&b.owner_id))
    });

    let mut expiring_subscriptions: Vec<ExpiringSubscription> = subscriptions
        .iter()
        .filter(|s| prefs_of(s.user_id).course_updates)
        .filter(|s| s.expires_within(today, window))
        .filter_map(|s| {
            s.valid_until.map(|valid_until| ExpiringSubscription {
                subscription_id: s.id,
                user_id: s.user_id,
                user_name: s.user_name.clone(),
                course_name: s.course_name.clone(),
                valid_until,
                days_left: days_until(today, valid_until),
            })
        })
        .collect();
    expiring_subscriptions.sort_by_key(|e| e.valid_until);

    let mut starting_trainings: Vec<StartingTraining> = trainings
        .iter()
        .filter(|t| prefs_of(t.user_id).training_reminders)
        .filter(|t| t.status == TrainingStatus::Upcoming)
        .filter_map(|t| {
            let days_left = days_until(today, t.start_date);
            (0..=i64::from(window)).contains(&days_left).then(|| StartingTraining {
                training_id: t.id,
                user_id: t.user_id,
                user_name: t.user_name.clone(),
                program: t.program.clone(),
                start_date: t.start_date,
                days_left,
            })
        })
        .collect();
    starting_trainings.sort_by_key(|t| t.start_date);

    Ok(Json(RemindersResponse {
        today,
        window_days: window,
        payments,
        expiring_subscriptions,
        starting_trainings,
    }))
}
