//! HTTP API Layer
//!
//! This crate provides the REST API for the enrollment admin system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for users, subscriptions, trainings, their payment ledgers
//!   and the notification feed
//! - **Middleware**: Authentication, admin-only writes, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::in_memory(config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{delete, get, post, put},
    middleware as axum_middleware,
};
use chrono::NaiveDate;
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_enrollment::{
    InMemoryNotificationStore, InMemorySubscriptionStore, InMemoryTrainingStore, InMemoryUserStore,
    NotificationPort, SubscriptionPort, TrainingPort, UserPort,
};

use crate::config::ApiConfig;
use crate::middleware::{admin_write_middleware, auth_middleware, audit_middleware};
use crate::handlers::payments::{self, PaymentOwner, SubscriptionPayments, TrainingPayments};
use crate::handlers::{health, notifications, reports, subscriptions, trainings, users};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserPort>,
    pub subscriptions: Arc<dyn SubscriptionPort>,
    pub trainings: Arc<dyn TrainingPort>,
    pub notifications: Arc<dyn NotificationPort>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserPort>,
        subscriptions: Arc<dyn SubscriptionPort>,
        trainings: Arc<dyn TrainingPort>,
        notifications: Arc<dyn NotificationPort>,
        config: ApiConfig,
    ) -> Self {
        Self {
            users,
            subscriptions,
            trainings,
            notifications,
            config,
        }
    }

    /// State backed by empty in-memory stores
    pub fn in_memory(config: ApiConfig) -> Self {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemorySubscriptionStore::new()),
            Arc::new(InMemoryTrainingStore::new()),
            Arc::new(InMemoryNotificationStore::new()),
            config,
        )
    }

    /// Today's date in the configured timezone
    pub fn today(&self) -> NaiveDate {
        self.config.timezone.today()
    }
}

/// Adds the payment ledger routes under `/:id/payment`
fn with_payment_routes<O: PaymentOwner>(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/:id/payment", get(payments::get_payment::<O>))
        .route("/:id/payment/installments", post(payments::add_installment::<O>))
        .route(
            "/:id/payment/installments/:iid",
            put(payments::update_installment::<O>).delete(payments::remove_installment::<O>),
        )
        .route("/:id/payment/installments/:iid/pay", post(payments::mark_paid::<O>))
        .route("/:id/payment/installments/:iid/unpay", post(payments::mark_pending::<O>))
        .route("/:id/payment/installments/:iid/proof", post(payments::attach_installment_proof::<O>))
        .route("/:id/payment/proofs", post(payments::attach_proof::<O>))
}

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Repositories and configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/:id",
            get(users::get_user).put(users::update_user).delete(users::delete_user),
        )
        .route(
            "/:id/preferences",
            get(users::get_preferences).put(users::update_preferences),
        );

    let notification_routes = Router::new()
        .route(
            "/",
            get(notifications::list_notifications).post(notifications::create_notification),
        )
        .route("/read-all", post(notifications::mark_all_read))
        .route("/:id", delete(notifications::delete_notification))
        .route("/:id/read", post(notifications::mark_read));

    let subscription_routes = with_payment_routes::<SubscriptionPayments>(
        Router::new()
            .route("/", get(subscriptions::list_subscriptions).post(subscriptions::create_subscription))
            .route(
                "/:id",
                get(subscriptions::get_subscription)
                    .put(subscriptions::update_subscription)
                    .delete(subscriptions::delete_subscription),
            ),
    );

    let training_routes = with_payment_routes::<TrainingPayments>(
        Router::new()
            .route("/", get(trainings::list_trainings).post(trainings::create_training))
            .route(
                "/:id",
                get(trainings::get_training)
                    .put(trainings::update_training)
                    .delete(trainings::delete_training),
            )
            .route("/:id/status", put(trainings::update_status)),
    );

    // Protected API routes
    let api_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/subscriptions", subscription_routes)
        .nest("/trainings", training_routes)
        .nest("/notifications", notification_routes)
        .route("/stats", get(reports::get_stats))
        .route("/export", get(reports::export_data))
        .route("/reminders", get(reports::get_reminders))
        .layer(axum_middleware::from_fn(admin_write_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
