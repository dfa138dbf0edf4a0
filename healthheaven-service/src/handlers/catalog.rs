//! Shop items and categories.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use mongodb::bson::Document;
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{
    CategoryUpdateRequest, DeleteResponse, InsertOneResponse, ShopQuery, UpdateResponse,
};
use crate::startup::AppState;
use crate::utils::{document_to_json, documents_to_json, parse_object_id};

#[tracing::instrument(skip(state, item))]
pub async fn add_to_shop(
    State(state): State<AppState>,
    Json(item): Json<Document>,
) -> Result<Json<InsertOneResponse>, AppError> {
    let seller_uid = item.get("sellerUid").cloned();
    let result = state.db.insert_shop_item(item).await?;
    tracing::info!(seller_uid = ?seller_uid, "Shop item added");
    Ok(Json(result.into()))
}

pub async fn list_shop(
    State(state): State<AppState>,
    Query(query): Query<ShopQuery>,
) -> Result<Json<Value>, AppError> {
    let items = state.db.list_shop_items(query.category.as_deref()).await?;
    Ok(Json(documents_to_json(items)))
}

pub async fn list_discounted(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let items = state.db.list_discounted_items().await?;
    Ok(Json(documents_to_json(items)))
}

pub async fn list_by_seller(
    State(state): State<AppState>,
    Path(seller_uid): Path<String>,
) -> Result<Json<Value>, AppError> {
    let items = state.db.list_items_by_seller(&seller_uid).await?;
    Ok(Json(documents_to_json(items)))
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Value>, AppError> {
    let items = state.db.list_shop_items(Some(&category)).await?;
    Ok(Json(documents_to_json(items)))
}

pub async fn get_shop_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_object_id(&id)?;
    let item = state.db.find_shop_item(id).await?;
    Ok(Json(document_to_json(item)))
}

#[tracing::instrument(skip(state, fields))]
pub async fn update_shop_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<Document>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.update_shop_item(id, fields).await?;
    Ok(Json(result.into()))
}

pub async fn delete_shop_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.delete_shop_item(id).await?;
    Ok(Json(result.into()))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(category): Json<Document>,
) -> Result<Json<InsertOneResponse>, AppError> {
    let result = state.db.insert_category(category).await?;
    Ok(Json(result.into()))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let categories = state.db.list_categories().await?;
    Ok(Json(documents_to_json(categories)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_object_id(&id)?;
    let category = state.db.find_category(id).await?;
    Ok(Json(document_to_json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<CategoryUpdateRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.update_category(id, &update).await?;
    Ok(Json(result.into()))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.delete_category(id).await?;
    Ok(Json(result.into()))
}
