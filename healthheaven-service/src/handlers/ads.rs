use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::Document;
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{DeleteResponse, InsertOneResponse, UpdateResponse};
use crate::models::AdStatus;
use crate::services::record_ad_toggle;
use crate::startup::AppState;
use crate::utils::{documents_to_json, parse_object_id};

pub async fn create_ad(
    State(state): State<AppState>,
    Json(ad): Json<Document>,
) -> Result<Json<InsertOneResponse>, AppError> {
    let seller_uid = ad.get("sellerUid").cloned();
    let result = state.db.insert_advertisement(ad).await?;
    tracing::info!(seller_uid = ?seller_uid, "Advertisement created");
    Ok(Json(result.into()))
}

pub async fn list_ads(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let ads = state.db.list_advertisements().await?;
    Ok(Json(documents_to_json(ads)))
}

/// Ads currently shown on the home page banner.
pub async fn list_added_ads(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let ads = state.db.list_ads_with_status(AdStatus::Added).await?;
    Ok(Json(documents_to_json(ads)))
}

pub async fn list_seller_ads(
    State(state): State<AppState>,
    Path(seller_uid): Path<String>,
) -> Result<Json<Value>, AppError> {
    let ads = state.db.list_ads_by_seller(&seller_uid).await?;
    Ok(Json(documents_to_json(ads)))
}

#[tracing::instrument(skip(state))]
pub async fn toggle_ad(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = parse_object_id(&id)?;

    match state.db.toggle_advertisement(id).await? {
        Some((status, result)) => {
            record_ad_toggle(status.as_str());
            tracing::info!(ad_id = %id, status = %status, "Advertisement toggled");
            Ok(Json(result.into()))
        }
        None => {
            tracing::debug!(ad_id = %id, "Toggle requested for unknown advertisement");
            Ok(Json(UpdateResponse::unmatched()))
        }
    }
}

pub async fn delete_ad(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.delete_advertisement(id).await?;
    Ok(Json(result.into()))
}
