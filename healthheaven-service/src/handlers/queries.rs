//! Support tickets.

use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::{self, Document};
use serde_json::Value;
use service_core::error::AppError;

use crate::dtos::{InsertOneResponse, UpdateResponse};
use crate::startup::AppState;
use crate::utils::{documents_to_json, parse_object_id};

pub async fn create_query(
    State(state): State<AppState>,
    Json(query): Json<Document>,
) -> Result<Json<InsertOneResponse>, AppError> {
    let user_id = query.get("userId").cloned();
    let result = state.db.insert_query(query).await?;
    tracing::info!(user_id = ?user_id, "Support query opened");
    Ok(Json(result.into()))
}

pub async fn list_queries(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let queries = state.db.list_queries().await?;
    Ok(Json(documents_to_json(queries)))
}

pub async fn list_user_queries(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let queries = state.db.list_queries_by_user(&user_id).await?;
    Ok(Json(documents_to_json(queries)))
}

/// Append the request body to the query's `replies`.
#[tracing::instrument(skip(state, reply))]
pub async fn reply_to_query(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(reply): Json<Document>,
) -> Result<Json<UpdateResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.append_reply(id, bson::Bson::Document(reply)).await?;
    Ok(Json(result.into()))
}
