use mongodb::bson::{Bson, Document};

use super::default_field;

/// A support query as it will be inserted. Replies are only ever appended.
pub fn new_query(mut query: Document) -> Document {
    default_field(&mut query, "replies", Bson::Array(Vec::new()));
    query
}
