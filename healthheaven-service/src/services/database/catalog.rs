use super::{find_all, HealthHeavenDb};
use crate::dtos::CategoryUpdateRequest;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    results::{DeleteResult, InsertOneResult, UpdateResult},
};
use service_core::error::AppError;

impl HealthHeavenDb {
    pub async fn insert_shop_item(&self, item: Document) -> Result<InsertOneResult, AppError> {
        Ok(self.shop().insert_one(item, None).await?)
    }

    pub async fn list_shop_items(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<Document>, AppError> {
        let filter = match category {
            Some(category) => doc! { "category": category },
            None => doc! {},
        };
        find_all(&self.shop(), filter).await
    }

    pub async fn list_discounted_items(&self) -> Result<Vec<Document>, AppError> {
        find_all(&self.shop(), doc! { "discount": { "$gt": 0 } }).await
    }

    pub async fn list_items_by_seller(&self, seller_uid: &str) -> Result<Vec<Document>, AppError> {
        find_all(&self.shop(), doc! { "sellerUid": seller_uid }).await
    }

    pub async fn find_shop_item(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self.shop().find_one(doc! { "_id": id }, None).await?)
    }

    /// `$set` the given fields verbatim. `_id` is immutable and dropped.
    pub async fn update_shop_item(
        &self,
        id: ObjectId,
        mut fields: Document,
    ) -> Result<UpdateResult, AppError> {
        fields.remove("_id");
        if fields.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("Nothing to update")));
        }

        Ok(self
            .shop()
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?)
    }

    pub async fn delete_shop_item(&self, id: ObjectId) -> Result<DeleteResult, AppError> {
        Ok(self.shop().delete_one(doc! { "_id": id }, None).await?)
    }

    pub async fn insert_category(&self, category: Document) -> Result<InsertOneResult, AppError> {
        Ok(self.categories().insert_one(category, None).await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Document>, AppError> {
        find_all(&self.categories(), doc! {}).await
    }

    pub async fn find_category(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self.categories().find_one(doc! { "_id": id }, None).await?)
    }

    /// Only the fields present in the request are overwritten.
    pub async fn update_category(
        &self,
        id: ObjectId,
        update: &CategoryUpdateRequest,
    ) -> Result<UpdateResult, AppError> {
        let mut fields = Document::new();
        if let Some(name) = &update.category_name {
            fields.insert("categoryName", name.clone());
        }
        if let Some(image) = &update.category_image {
            fields.insert("categoryImage", image.clone());
        }

        if fields.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Provide categoryName or categoryImage"
            )));
        }

        Ok(self
            .categories()
            .update_one(doc! { "_id": id }, doc! { "$set": fields }, None)
            .await?)
    }

    pub async fn delete_category(&self, id: ObjectId) -> Result<DeleteResult, AppError> {
        Ok(self.categories().delete_one(doc! { "_id": id }, None).await?)
    }
}
