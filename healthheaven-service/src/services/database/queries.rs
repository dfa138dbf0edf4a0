use super::{find_all, HealthHeavenDb};
use crate::models::new_query;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    results::{InsertOneResult, UpdateResult},
};
use service_core::error::AppError;

impl HealthHeavenDb {
    pub async fn insert_query(&self, query: Document) -> Result<InsertOneResult, AppError> {
        Ok(self.queries().insert_one(new_query(query), None).await?)
    }

    pub async fn list_queries(&self) -> Result<Vec<Document>, AppError> {
        find_all(&self.queries(), doc! {}).await
    }

    pub async fn list_queries_by_user(&self, user_id: &str) -> Result<Vec<Document>, AppError> {
        find_all(&self.queries(), doc! { "userId": user_id }).await
    }

    pub async fn append_reply(&self, id: ObjectId, reply: Bson) -> Result<UpdateResult, AppError> {
        Ok(self
            .queries()
            .update_one(doc! { "_id": id }, doc! { "$push": { "replies": reply } }, None)
            .await?)
    }
}
