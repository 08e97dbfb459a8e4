//! Payment ledger handlers
//!
//! Subscriptions and trainings share one set of handlers; a [`PaymentOwner`]
//! says where the record lives.

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use validator::Validate;

use core_kernel::{InstallmentId, Money};
use domain_payment::PaymentRecord;

use crate::auth::Claims;
use crate::dto::payment::*;
use crate::handlers::subscriptions::load_subscription;
use crate::handlers::trainings::load_training;
use crate::handlers::{metadata, parse_id};
use crate::{AppState, error::ApiError};

/// An entity that embeds a payment record
#[async_trait]
pub trait PaymentOwner: Send + Sync + 'static {
    /// Entity name used in logs
    const NAME: &'static str;

    /// Loads the owner's record after checking the caller may see it
    async fn load(state: &AppState, claims: &Claims, id: &str) -> Result<PaymentRecord, ApiError>;

    /// Writes the record back onto its owner
    async fn store(
        state: &AppState,
        claims: &Claims,
        id: &str,
        record: PaymentRecord,
    ) -> Result<(), ApiError>;
}

/// Payment records of subscriptions
pub enum SubscriptionPayments {}

/// Payment records of training enrollments
pub enum TrainingPayments {}

#[async_trait]
impl PaymentOwner for SubscriptionPayments {
    const NAME: &'static str = "subscription";

    async fn load(state: &AppState, claims: &Claims, id: &str) -> Result<PaymentRecord, ApiError> {
        Ok(load_subscription(state, claims, id).await?.payment)
    }

    async fn store(
        state: &AppState,
        claims: &Claims,
        id: &str,
        record: PaymentRecord,
    ) -> Result<(), ApiError> {
        let mut subscription = load_subscription(state, claims, id).await?;
        subscription.payment = record;
        state
            .subscriptions
            .update_subscription(subscription, metadata(claims))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl PaymentOwner for TrainingPayments {
    const NAME: &'static str = "training";

    async fn load(state: &AppState, claims: &Claims, id: &str) -> Result<PaymentRecord, ApiError> {
        Ok(load_training(state, claims, id).await?.payment)
    }

    async fn store(
        state: &AppState,
        claims: &Claims,
        id: &str,
        record: PaymentRecord,
    ) -> Result<(), ApiError> {
        let mut training = load_training(state, claims, id).await?;
        training.payment = record;
        state.trainings.update_training(training, metadata(claims)).await?;
        Ok(())
    }
}

fn respond(state: &AppState, record: PaymentRecord) -> PaymentResponse {
    PaymentResponse::new(record, state.today(), state.config.reminder_window_days)
}

/// Load, change, store
async fn modify<O, F>(state: &AppState, claims: &Claims, id: &str, change: F) -> Result<PaymentRecord, ApiError>
where
    O: PaymentOwner,
    F: FnOnce(&mut PaymentRecord) -> Result<(), ApiError> + Send,
{
    let mut record = O::load(state, claims, id).await?;
    change(&mut record)?;
    O::store(state, claims, id, record.clone()).await?;
    Ok(record)
}

/// Gets the payment record with its summary and upcoming reminders
pub async fn get_payment<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let record = O::load(&state, &claims, &id).await?;
    Ok(Json(respond(&state, record)))
}

/// Appends a pending installment
pub async fn add_installment<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<InstallmentInput>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let record = modify::<O, _>(&state, &claims, &id, |record| {
        let amount = Money::new(request.amount, record.currency());
        let installment_id = record.add_installment(amount, request.due_date)?;
        info!(owner = O::NAME, owner_id = %id, %installment_id, "Installment added");
        Ok(())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&state, record))))
}

/// Edits an installment's amount and due date
pub async fn update_installment<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, installment_id)): Path<(String, String)>,
    Json(request): Json<InstallmentInput>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let installment_id: InstallmentId = parse_id(&installment_id, "installment")?;
    let record = modify::<O, _>(&state, &claims, &id, |record| {
        let amount = Money::new(request.amount, record.currency());
        record.update_installment(installment_id, amount, request.due_date)?;
        Ok(())
    })
    .await?;
    Ok(Json(respond(&state, record)))
}

/// Removes an installment; the last one cannot be removed
pub async fn remove_installment<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, installment_id)): Path<(String, String)>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let installment_id: InstallmentId = parse_id(&installment_id, "installment")?;
    let record = modify::<O, _>(&state, &claims, &id, |record| {
        record.remove_installment(installment_id)?;
        info!(owner = O::NAME, owner_id = %id, %installment_id, "Installment removed");
        Ok(())
    })
    .await?;
    Ok(Json(respond(&state, record)))
}

/// Marks an installment paid, on today's date unless one is given
pub async fn mark_paid<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, installment_id)): Path<(String, String)>,
    request: Result<Json<MarkPaidRequest>, JsonRejection>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let installment_id: InstallmentId = parse_id(&installment_id, "installment")?;
    let request = match request {
        Ok(Json(request)) => request,
        // No JSON body at all
        Err(JsonRejection::MissingJsonContentType(_)) => MarkPaidRequest::default(),
        Err(rejection) => return Err(rejection.into()),
    };
    let paid_date = request.paid_date.unwrap_or_else(|| state.today());
    let policy = state.config.payment_policy();

    let record = modify::<O, _>(&state, &claims, &id, |record| {
        record.mark_installment_paid_with(installment_id, paid_date, &policy)?;
        Ok(())
    })
    .await?;
    Ok(Json(respond(&state, record)))
}

/// Reverts a paid installment to pending
pub async fn mark_pending<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, installment_id)): Path<(String, String)>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let installment_id: InstallmentId = parse_id(&installment_id, "installment")?;
    let record = modify::<O, _>(&state, &claims, &id, |record| {
        record.mark_installment_pending(installment_id)?;
        Ok(())
    })
    .await?;
    Ok(Json(respond(&state, record)))
}

/// Attaches the receipt for one installment
pub async fn attach_installment_proof<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, installment_id)): Path<(String, String)>,
    Json(request): Json<InstallmentProofRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    request.validate()?;
    let installment_id: InstallmentId = parse_id(&installment_id, "installment")?;
    let record = modify::<O, _>(&state, &claims, &id, |record| {
        record.attach_installment_proof(installment_id, request.name, request.file_handle)?;
        Ok(())
    })
    .await?;
    Ok(Json(respond(&state, record)))
}

/// Attaches a receipt to the record as a whole
pub async fn attach_proof<O: PaymentOwner>(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(request): Json<ProofRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    request.validate()?;
    let upload_date = request.upload_date.unwrap_or_else(|| state.today());
    let record = modify::<O, _>(&state, &claims, &id, |record| {
        let proof_id = record.attach_proof(request.name, request.file_handle, upload_date)?;
        info!(owner = O::NAME, owner_id = %id, %proof_id, "Proof of payment attached");
        Ok(())
    })
    .await?;
    Ok((StatusCode::CREATED, Json(respond(&state, record))))
}
