//! Checkout: payment intents and payment records.

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{doc, Document};
use serde_json::Value;
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, InsertOneResponse,
    PaymentCompletionResponse,
};
use crate::services::{record_payment_intent, stripe::to_minor_units};
use crate::startup::AppState;
use crate::utils::documents_to_json;

/// Create a Stripe payment intent for the cart total and hand its client
/// secret to the browser.
#[tracing::instrument(skip(state, request), fields(price = request.price))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<Json<CreatePaymentIntentResponse>, AppError> {
    request.validate()?;

    let amount = to_minor_units(request.price);
    let intent = match state.stripe.create_payment_intent(amount).await {
        Ok(intent) => intent,
        Err(e) => {
            record_payment_intent("failed");
            tracing::error!(error = %e, amount, "Failed to create payment intent");
            return Err(e.into());
        }
    };
    record_payment_intent("created");

    let client_secret = intent.client_secret.ok_or_else(|| {
        AppError::BadGateway(format!(
            "Payment intent {} came back without a client secret",
            intent.id
        ))
    })?;

    Ok(Json(CreatePaymentIntentResponse { client_secret }))
}

#[tracing::instrument(skip(state, payment))]
pub async fn create_payment(
    State(state): State<AppState>,
    Json(payment): Json<Document>,
) -> Result<Json<InsertOneResponse>, AppError> {
    let transaction_id = payment.get("transactionId").cloned();
    let result = state.db.insert_payment(payment).await?;
    tracing::info!(transaction_id = ?transaction_id, "Payment recorded");
    Ok(Json(result.into()))
}

pub async fn list_payments(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let payments = state.db.list_payments(doc! {}).await?;
    Ok(Json(documents_to_json(payments)))
}

pub async fn list_user_payments(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let payments = state.db.list_payments(doc! { "userId": user_id }).await?;
    Ok(Json(documents_to_json(payments)))
}

/// Mark a transaction paid in both `payments` and `soldItems`.
#[tracing::instrument(skip(state))]
pub async fn complete_payment(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<PaymentCompletionResponse>, AppError> {
    let (payments, sold_items) = state.db.mark_transaction_paid(&transaction_id).await?;

    tracing::info!(
        transaction_id = %transaction_id,
        payments = payments.modified_count,
        sold_items = sold_items.modified_count,
        "Transaction marked paid"
    );

    Ok(Json(PaymentCompletionResponse {
        payments: payments.into(),
        sold_items: sold_items.into(),
    }))
}
