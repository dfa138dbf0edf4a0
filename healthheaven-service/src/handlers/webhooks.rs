use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
};
use service_core::error::AppError;

use crate::startup::AppState;

pub const STRIPE_SIGNATURE_HEADER: &str = "Stripe-Signature";

/// Stripe webhook receiver.
///
/// Only `payment_intent.succeeded` changes state: the intent id is the
/// `transactionId` stored on payments and sold records, which are marked
/// paid. Every verified event is acknowledged with 200 so Stripe stops
/// retrying.
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<StatusCode, AppError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            tracing::warn!("Missing Stripe-Signature header");
            AppError::Unauthorized(anyhow::anyhow!("Missing webhook signature"))
        })?;

    let now = chrono::Utc::now().timestamp();
    let is_valid = state
        .stripe
        .verify_webhook_signature(&body, signature, now)?;

    if !is_valid {
        return Err(AppError::Unauthorized(anyhow::anyhow!(
            "Invalid webhook signature"
        )));
    }

    let event = state.stripe.parse_webhook_event(&body).map_err(|e| {
        tracing::error!(error = %e, "Failed to parse webhook event");
        AppError::BadRequest(anyhow::anyhow!("Invalid webhook payload"))
    })?;

    tracing::info!(event_id = %event.id, event_type = %event.event_type, "Processing Stripe webhook");

    match event.event_type.as_str() {
        "payment_intent.succeeded" => {
            if let Some(intent_id) = event.object_id() {
                let (payments, sold_items) = state.db.mark_transaction_paid(intent_id).await?;
                tracing::info!(
                    transaction_id = %intent_id,
                    payments = payments.modified_count,
                    sold_items = sold_items.modified_count,
                    "Transaction marked paid via webhook"
                );
            }
        }
        "payment_intent.payment_failed" => {
            tracing::warn!(payment_intent_id = ?event.object_id(), "Payment failed");
        }
        _ => {
            tracing::debug!(event_type = %event.event_type, "Unhandled webhook event type");
        }
    }

    Ok(StatusCode::OK)
}
