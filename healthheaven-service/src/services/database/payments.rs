use super::{find_all, HealthHeavenDb};
use crate::models::{new_payment_record, PaymentStatus};
use mongodb::{
    bson::{doc, Document},
    results::{InsertManyResult, InsertOneResult, UpdateResult},
};
use service_core::error::AppError;

impl HealthHeavenDb {
    pub async fn insert_sold_records(
        &self,
        records: Vec<Document>,
    ) -> Result<InsertManyResult, AppError> {
        if records.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Expected at least one sold record"
            )));
        }
        let records = records.into_iter().map(new_payment_record);
        Ok(self.sold_items().insert_many(records, None).await?)
    }

    pub async fn list_sold_records(&self, filter: Document) -> Result<Vec<Document>, AppError> {
        find_all(&self.sold_items(), filter).await
    }

    pub async fn insert_payment(&self, payment: Document) -> Result<InsertOneResult, AppError> {
        Ok(self.payments().insert_one(new_payment_record(payment), None).await?)
    }

    pub async fn list_payments(&self, filter: Document) -> Result<Vec<Document>, AppError> {
        find_all(&self.payments(), filter).await
    }

    /// Mark every payment and sold record for the transaction as paid.
    ///
    /// Two independent writes. If the second fails the payments collection
    /// is already updated and sold records stay pending.
    pub async fn mark_transaction_paid(
        &self,
        transaction_id: &str,
    ) -> Result<(UpdateResult, UpdateResult), AppError> {
        let filter = doc! { "transactionId": transaction_id };
        let update = doc! {
            "$set": { "status": PaymentStatus::Paid.as_str() }
        };

        let payments = self
            .payments()
            .update_many(filter.clone(), update.clone(), None)
            .await?;

        let sold_items = self
            .sold_items()
            .update_many(filter, update, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    transaction_id = %transaction_id,
                    payments_modified = payments.modified_count,
                    error = %e,
                    "Payments marked paid but sold records were not updated"
                );
                AppError::from(e)
            })?;

        Ok((payments, sold_items))
    }
}
