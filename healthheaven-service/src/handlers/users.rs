use axum::{
    extract::{Path, State},
    Json,
};
use mongodb::bson::Document;
use serde_json::Value;
use service_core::error::AppError;
use validator::Validate;

use crate::dtos::{
    DeleteResponse, InsertOneResponse, RoleUpdateRequest, UpdateResponse, UserExistsResponse,
};
use crate::startup::AppState;
use crate::utils::{document_to_json, documents_to_json, parse_object_id};

#[tracing::instrument(skip(state, user))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(user): Json<Document>,
) -> Result<Json<InsertOneResponse>, AppError> {
    let uid = user.get("uid").cloned();
    let result = state.db.insert_user(user).await?;
    tracing::info!(uid = ?uid, "User stored");
    Ok(Json(result.into()))
}

pub async fn list_users(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let users = state.db.list_users().await?;
    Ok(Json(documents_to_json(users)))
}

/// Lets the client skip storing a user that signed in before.
pub async fn check_user_exists(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserExistsResponse>, AppError> {
    let user = state.db.find_user_by_uid(&uid).await?;
    Ok(Json(UserExistsResponse {
        is_in_data: user.is_some(),
    }))
}

/// The user document for an auth uid, or `null`.
pub async fn get_user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state.db.find_user_by_uid(&uid).await?;
    Ok(Json(document_to_json(user)))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RoleUpdateRequest>,
) -> Result<Json<UpdateResponse>, AppError> {
    request.validate()?;
    let id = parse_object_id(&id)?;

    let result = state.db.update_user_role(id, &request.role).await?;
    tracing::info!(
        user_id = %id,
        role = %request.role,
        matched = result.matched_count,
        "User role updated"
    );
    Ok(Json(result.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let id = parse_object_id(&id)?;
    let result = state.db.delete_user(id).await?;
    Ok(Json(result.into()))
}
