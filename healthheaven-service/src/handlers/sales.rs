use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{doc, Document};
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::InsertManyResponse;
use crate::startup::AppState;
use crate::utils::documents_to_json;

/// Store one record per item sold in a checkout.
#[tracing::instrument(skip(state, records), fields(count = records.len()))]
pub async fn record_sales(
    State(state): State<AppState>,
    Json(records): Json<Vec<Document>>,
) -> Result<Json<InsertManyResponse>, AppError> {
    let result = state.db.insert_sold_records(records).await?;
    tracing::info!("Sold records stored");
    Ok(Json(result.into()))
}

pub async fn list_sales(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let records = state.db.list_sold_records(doc! {}).await?;
    Ok(Json(documents_to_json(records)))
}

pub async fn list_seller_sales(
    State(state): State<AppState>,
    Path(seller_uid): Path<String>,
) -> Result<Json<Value>, AppError> {
    let records = state
        .db
        .list_sold_records(doc! { "sellerUid": seller_uid })
        .await?;
    Ok(Json(documents_to_json(records)))
}

pub async fn list_user_purchases(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let records = state
        .db
        .list_sold_records(doc! { "userId": user_id })
        .await?;
    Ok(Json(documents_to_json(records)))
}
