//! Request and response bodies.
//!
//! Write responses mirror the result objects the MongoDB drivers return, so
//! the frontend can keep checking `insertedId`, `modifiedCount` and friends.

use mongodb::bson::Bson;
use mongodb::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use validator::Validate;

use crate::utils::bson_to_json;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResponse {
    pub acknowledged: bool,
    pub inserted_id: Value,
}

impl From<InsertOneResult> for InsertOneResponse {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: bson_to_json(result.inserted_id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertManyResponse {
    pub acknowledged: bool,
    pub inserted_count: usize,
    pub inserted_ids: BTreeMap<usize, Value>,
}

impl From<InsertManyResult> for InsertManyResponse {
    fn from(result: InsertManyResult) -> Self {
        let inserted_ids: BTreeMap<usize, Value> = result
            .inserted_ids
            .into_iter()
            .map(|(index, id)| (index, bson_to_json(id)))
            .collect();
        Self {
            acknowledged: true,
            inserted_count: inserted_ids.len(),
            inserted_ids,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Value>,
}

impl UpdateResponse {
    /// Result for an update whose target document does not exist.
    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_count: 0,
            upserted_id: None,
        }
    }
}

impl From<UpdateResult> for UpdateResponse {
    fn from(result: UpdateResult) -> Self {
        let upserted_id = result.upserted_id.map(bson_to_json);
        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteResponse {
    fn from(result: DeleteResult) -> Self {
        Self {
            acknowledged: true,
            deleted_count: result.deleted_count,
        }
    }
}

/// Answer to "has this auth uid been stored yet?".
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExistsResponse {
    pub is_in_data: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RoleUpdateRequest {
    #[validate(length(min = 1, message = "Role cannot be empty"))]
    pub role: String,
}

/// Fields are stored as sent; absent or `null` leaves the field unchanged.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdateRequest {
    pub category_name: Option<Bson>,
    pub category_image: Option<Bson>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ShopQuery {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentIntentRequest {
    /// Order total in major currency units (dollars).
    #[validate(range(min = 0.5, message = "Price must be at least 0.50"))]
    pub price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    pub client_secret: String,
}

/// Outcome of marking a transaction paid in both ledgers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentCompletionResponse {
    pub payments: UpdateResponse,
    pub sold_items: UpdateResponse,
}
