use std::sync::Arc;

use axum::{
    extract::Path, http::StatusCode, response::IntoResponse, routing::get, Extension, Json, Router,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::SubscriptionExt,
    dtos::{CreateSubscriptionDto, FilterSubscriptionDto, UpdateSubscriptionDto},
    error::{ErrorMessage, HttpError},
    models::subscriptionmodel::BillingCycle,
    service::{renewal::next_renewal_date, stats::compute_subscription_stats},
    AppState,
};

// Clients may call every path with or without the trailing slash.
pub fn subscriptions_handler() -> Router {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/stats", get(subscription_stats))
        .route("/stats/", get(subscription_stats))
        .route(
            "/:id",
            get(retrieve_subscription)
                .put(update_subscription)
                .patch(update_subscription)
                .delete(cancel_subscription),
        )
        .route(
            "/:id/",
            get(retrieve_subscription)
                .put(update_subscription)
                .patch(update_subscription)
                .delete(cancel_subscription),
        )
}

pub async fn list_subscriptions(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let subscriptions = app_state
        .db_client
        .get_active_subscriptions()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(FilterSubscriptionDto::filter_subscriptions(
        &subscriptions,
    )))
}

pub async fn create_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<CreateSubscriptionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let billing_cycle = BillingCycle::from_str(&body.billing_cycle)
        .ok_or_else(|| HttpError::bad_request(ErrorMessage::InvalidBillingCycle.to_string()))?;

    let today = Utc::now().date_naive();
    let renewal_date = next_renewal_date(body.start_date, billing_cycle, today);

    let subscription = app_state
        .db_client
        .save_subscription(
            body.name,
            body.cost,
            billing_cycle,
            body.start_date,
            renewal_date,
            body.is_active.unwrap_or(true),
            body.category.unwrap_or_default(),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(FilterSubscriptionDto::filter_subscription(&subscription)),
    ))
}

pub async fn retrieve_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let subscription = app_state
        .db_client
        .get_subscription(subscription_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SubscriptionNotFound.to_string()))?;

    Ok(Json(FilterSubscriptionDto::filter_subscription(
        &subscription,
    )))
}

pub async fn update_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(subscription_id): Path<Uuid>,
    Json(body): Json<UpdateSubscriptionDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let existing = app_state
        .db_client
        .get_subscription(subscription_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SubscriptionNotFound.to_string()))?;

    // Omitted start_date/billing_cycle fall back to the stored values so a
    // partial update cannot invalidate the renewal computation.
    let billing_cycle = match &body.billing_cycle {
        Some(value) => BillingCycle::from_str(value)
            .ok_or_else(|| HttpError::bad_request(ErrorMessage::InvalidBillingCycle.to_string()))?,
        None => existing.billing_cycle,
    };
    let start_date = body.start_date.unwrap_or(existing.start_date);

    let today = Utc::now().date_naive();
    let renewal_date = next_renewal_date(start_date, billing_cycle, today);

    let subscription = app_state
        .db_client
        .update_subscription(
            subscription_id,
            body.name.unwrap_or(existing.name),
            body.cost.unwrap_or(existing.cost),
            billing_cycle,
            start_date,
            renewal_date,
            body.is_active.unwrap_or(existing.is_active),
            body.category.unwrap_or(existing.category),
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SubscriptionNotFound.to_string()))?;

    Ok(Json(FilterSubscriptionDto::filter_subscription(
        &subscription,
    )))
}

pub async fn cancel_subscription(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    app_state
        .db_client
        .cancel_subscription(subscription_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found(ErrorMessage::SubscriptionNotFound.to_string()))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn subscription_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let subscriptions = app_state
        .db_client
        .get_active_subscriptions()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let today = Utc::now().date_naive();

    Ok(Json(compute_subscription_stats(&subscriptions, today)))
}
