//! Training enrollment handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::TrainingId;
use domain_enrollment::{TrainingEnrollment, TrainingQuery, TrainingUpdate};

use crate::auth::Claims;
use crate::dto::enrollment::*;
use crate::handlers::subscriptions::load_owner;
use crate::handlers::{metadata, parse_id};
use crate::{AppState, error::ApiError};

/// Loads a training the caller is allowed to see
pub(crate) async fn load_training(
    state: &AppState,
    claims: &Claims,
    id: &str,
) -> Result<TrainingEnrollment, ApiError> {
    let id: TrainingId = parse_id(id, "training")?;
    let training = state.trainings.get_training(id, metadata(claims)).await?;
    claims.ensure_can_access(training.user_id)?;
    Ok(training)
}

/// Lists training enrollments; non-admins see their own
pub async fn list_trainings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(mut query): Query<TrainingQuery>,
) -> Result<Json<ListResponse<TrainingResponse>>, ApiError> {
    if !claims.is_admin() {
        let own = claims
            .user_id()
            .ok_or_else(|| ApiError::Forbidden("Token does not name a user".to_string()))?;
        query.user_id = Some(own);
    }

    let today = state.today();
    let page = state.trainings.find_trainings(query, metadata(&claims)).await?;
    Ok(Json(ListResponse {
        items: page
            .items
            .into_iter()
            .map(|t| TrainingResponse::new(t, today))
            .collect(),
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

pub async fn create_training(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateTrainingRequest>,
) -> Result<(StatusCode, Json<TrainingResponse>), ApiError> {
    request.validate()?;
    let owner = load_owner(&state, &claims, request.user_id).await?;
    let (details, plan) = request.into_parts(&owner);
    let training = TrainingEnrollment::new(details, plan.into_record()?)?;

    let training = state.trainings.create_training(training, metadata(&claims)).await?;
    info!(
        training_id = %training.id,
        user_id = %training.user_id,
        program = %training.program,
        "Training created"
    );
    Ok((StatusCode::CREATED, Json(TrainingResponse::new(training, state.today()))))
}

pub async fn get_training(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<TrainingResponse>, ApiError> {
    let training = load_training(&state, &claims, &id).await?;
    Ok(Json(TrainingResponse::new(training, state.today())))
}

/// Replaces a training's details; the status is taken as given
pub async fn update_training(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTrainingRequest>,
) -> Result<Json<TrainingResponse>, ApiError> {
    request.validate()?;
    let mut training = load_training(&state, &claims, &id).await?;
    let owner = load_owner(&state, &claims, request.user_id).await?;

    let (details, plan) = request.into_parts(&owner);
    let payment = plan.map(|p| p.into_record()).transpose()?;
    training.update(TrainingUpdate { details, payment })?;

    let training = state.trainings.update_training(training, metadata(&claims)).await?;
    Ok(Json(TrainingResponse::new(training, state.today())))
}

/// Checked lifecycle change: `upcoming -> in-progress -> completed`
///
/// Repeating the current status only applies the progress value.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<TrainingStatusRequest>,
) -> Result<Json<TrainingResponse>, ApiError> {
    request.validate()?;
    let mut training = load_training(&state, &claims, &id).await?;

    if training.status != request.status {
        training.transition_to(request.status)?;
    }
    if let Some(progress) = request.progress {
        training.set_progress(progress)?;
    }

    let training = state.trainings.update_training(training, metadata(&claims)).await?;
    Ok(Json(TrainingResponse::new(training, state.today())))
}

pub async fn delete_training(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: TrainingId = parse_id(&id, "training")?;
    state.trainings.delete_training(id, metadata(&claims)).await?;
    info!(training_id = %id, "Training deleted");
    Ok(StatusCode::NO_CONTENT)
}
