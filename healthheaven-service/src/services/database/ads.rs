use super::{find_all, HealthHeavenDb};
use crate::models::{new_advertisement, AdStatus};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    results::{DeleteResult, InsertOneResult, UpdateResult},
};
use service_core::error::AppError;

impl HealthHeavenDb {
    pub async fn insert_advertisement(
        &self,
        ad: Document,
    ) -> Result<InsertOneResult, AppError> {
        Ok(self
            .advertisements()
            .insert_one(new_advertisement(ad), None)
            .await?)
    }

    pub async fn list_advertisements(&self) -> Result<Vec<Document>, AppError> {
        find_all(&self.advertisements(), doc! {}).await
    }

    pub async fn list_ads_with_status(
        &self,
        status: AdStatus,
    ) -> Result<Vec<Document>, AppError> {
        find_all(&self.advertisements(), doc! { "status": status.as_str() }).await
    }

    pub async fn list_ads_by_seller(
        &self,
        seller_uid: &str,
    ) -> Result<Vec<Document>, AppError> {
        find_all(&self.advertisements(), doc! { "sellerUid": seller_uid }).await
    }

    /// Flip the ad between `added` and `not added`.
    ///
    /// Read and write are separate calls; two concurrent toggles may both
    /// read the same status. Returns `None` when the ad does not exist.
    pub async fn toggle_advertisement(
        &self,
        id: ObjectId,
    ) -> Result<Option<(AdStatus, UpdateResult)>, AppError> {
        let Some(current) = self
            .advertisements()
            .find_one(doc! { "_id": id }, None)
            .await?
        else {
            return Ok(None);
        };

        let next = AdStatus::toggle(current.get_str("status").ok());
        let result = self
            .advertisements()
            .update_one(
                doc! { "_id": id },
                doc! { "$set": { "status": next.as_str() } },
                None,
            )
            .await?;

        Ok(Some((next, result)))
    }

    pub async fn delete_advertisement(&self, id: ObjectId) -> Result<DeleteResult, AppError> {
        Ok(self
            .advertisements()
            .delete_one(doc! { "_id": id }, None)
            .await?)
    }
}
