use super::{find_all, HealthHeavenDb};
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    results::{DeleteResult, InsertOneResult, UpdateResult},
};
use service_core::error::AppError;

impl HealthHeavenDb {
    pub async fn insert_user(&self, user: Document) -> Result<InsertOneResult, AppError> {
        Ok(self.users().insert_one(user, None).await?)
    }

    pub async fn list_users(&self) -> Result<Vec<Document>, AppError> {
        find_all(&self.users(), doc! {}).await
    }

    pub async fn find_user_by_uid(&self, uid: &str) -> Result<Option<Document>, AppError> {
        Ok(self.users().find_one(doc! { "uid": uid }, None).await?)
    }

    /// Admin action. Roles are stored only; nothing server-side reads them.
    pub async fn update_user_role(
        &self,
        id: ObjectId,
        role: &str,
    ) -> Result<UpdateResult, AppError> {
        Ok(self
            .users()
            .update_one(doc! { "_id": id }, doc! { "$set": { "role": role } }, None)
            .await?)
    }

    pub async fn delete_user(&self, id: ObjectId) -> Result<DeleteResult, AppError> {
        Ok(self.users().delete_one(doc! { "_id": id }, None).await?)
    }
}
