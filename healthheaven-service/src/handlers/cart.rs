use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use mongodb::bson::Document;
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{DeleteResponse, InsertOneResponse, UpdateResponse};
use crate::models::{CartAction, CartKey};
use crate::services::{record_cart_addition, CartAddOutcome};
use crate::startup::AppState;
use crate::utils::{documents_to_json, parse_object_id};

/// Add an item to the cart, or bump its quantity if the user already has it
/// from the same seller.
///
/// Responds with the insert result for a new entry and the update result for
/// an increment.
#[tracing::instrument(skip(state, entry), fields(item_id = ?entry.get("itemId"), user_id = ?entry.get("userId")))]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(entry): Json<Document>,
) -> Result<Response, AppError> {
    let outcome = state.db.add_to_cart(entry).await?;

    record_cart_addition(outcome.label());
    tracing::info!(outcome = outcome.label(), "Cart updated");

    Ok(match outcome {
        CartAddOutcome::Inserted(result) => Json(InsertOneResponse::from(result)).into_response(),
        CartAddOutcome::Incremented(result) => Json(UpdateResponse::from(result)).into_response(),
    })
}

pub async fn list_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let entries = state.db.list_cart(&user_id).await?;
    Ok(Json(documents_to_json(entries)))
}

/// `PATCH /cart/increase` or `PATCH /cart/decrease` with the entry's key as
/// the body.
#[tracing::instrument(skip(state, body))]
pub async fn adjust_quantity(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(body): Json<Document>,
) -> Result<Json<UpdateResponse>, AppError> {
    let action: CartAction = action.parse().map_err(AppError::BadRequest)?;
    let key = CartKey::from_document(&body);
    let result = state.db.adjust_cart_quantity(&key, action.delta()).await?;

    tracing::info!(
        action = %action,
        item_id = ?key.item_id,
        matched = result.matched_count,
        "Cart quantity adjusted"
    );
    Ok(Json(result.into()))
}

pub async fn delete_cart_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.delete_cart_entry(id).await?;
    Ok(Json(result.into()))
}

/// Empty a user's cart, typically right after checkout.
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let result = state.db.clear_cart(&user_id).await?;
    tracing::info!(user_id = %user_id, deleted = result.deleted_count, "Cart cleared");
    Ok(Json(result.into()))
}
