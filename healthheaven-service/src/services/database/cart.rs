use super::{find_all, HealthHeavenDb};
use crate::models::{new_cart_entry, CartKey};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    error::{ErrorKind, WriteFailure},
    results::{DeleteResult, InsertOneResult, UpdateResult},
};
use service_core::error::AppError;

const DUPLICATE_KEY: i32 = 11000;

/// What a cart add did to the store.
#[derive(Debug)]
pub enum CartAddOutcome {
    /// No entry existed for the key; a new one was inserted.
    Inserted(InsertOneResult),
    /// An entry existed; its quantity was incremented by one.
    Incremented(UpdateResult),
}

impl CartAddOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CartAddOutcome::Inserted(_) => "inserted",
            CartAddOutcome::Incremented(_) => "incremented",
        }
    }
}

impl HealthHeavenDb {
    /// Insert the entry, or bump the quantity of the existing entry with
    /// the same (item, seller, user) key.
    ///
    /// The unique `cart_key_idx` index turns a lost insert race into a
    /// duplicate key error, which is retried as an increment.
    pub async fn add_to_cart(&self, entry: Document) -> Result<CartAddOutcome, AppError> {
        let key = CartKey::from_document(&entry);

        let existing = self.cart().find_one(key.filter(), None).await?;

        if existing.is_some() {
            let result = self.adjust_cart_quantity(&key, 1).await?;
            return Ok(CartAddOutcome::Incremented(result));
        }

        match self.cart().insert_one(new_cart_entry(entry), None).await {
            Ok(result) => Ok(CartAddOutcome::Inserted(result)),
            Err(e) if is_duplicate_key(&e) => {
                tracing::debug!(
                    item_id = ?key.item_id,
                    user_id = ?key.user_id,
                    "Concurrent cart insert, falling back to increment"
                );
                let result = self.adjust_cart_quantity(&key, 1).await?;
                Ok(CartAddOutcome::Incremented(result))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn adjust_cart_quantity(
        &self,
        key: &CartKey,
        delta: i32,
    ) -> Result<UpdateResult, AppError> {
        Ok(self
            .cart()
            .update_one(key.filter(), doc! { "$inc": { "quantity": delta } }, None)
            .await?)
    }

    pub async fn list_cart(&self, user_id: &str) -> Result<Vec<Document>, AppError> {
        find_all(&self.cart(), doc! { "userId": user_id }).await
    }

    pub async fn delete_cart_entry(&self, id: ObjectId) -> Result<DeleteResult, AppError> {
        Ok(self.cart().delete_one(doc! { "_id": id }, None).await?)
    }

    pub async fn clear_cart(&self, user_id: &str) -> Result<DeleteResult, AppError> {
        Ok(self
            .cart()
            .delete_many(doc! { "userId": user_id }, None)
            .await?)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
