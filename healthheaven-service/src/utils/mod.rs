//! Conversions between BSON and the JSON the frontend expects.

use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde_json::Value;
use service_core::error::AppError;

/// Render a BSON value the way the browser client reads it: ObjectIds as
/// bare hex strings, dates as RFC 3339, everything else as relaxed
/// extended JSON.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(s) => Value::String(s),
            Err(_) => Value::from(dt.timestamp_millis()),
        },
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// Render a `find` result as a JSON array.
pub fn documents_to_json(documents: Vec<Document>) -> Value {
    Value::Array(
        documents
            .into_iter()
            .map(|document| bson_to_json(Bson::Document(document)))
            .collect(),
    )
}

/// Render a `findOne` result; a miss is `null`.
pub fn document_to_json(document: Option<Document>) -> Value {
    document.map_or(Value::Null, |document| {
        bson_to_json(Bson::Document(document))
    })
}

pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, DateTime};
    use serde_json::json;

    #[test]
    fn object_ids_render_as_hex() {
        let oid = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let rendered = bson_to_json(Bson::Document(doc! {
            "_id": oid,
            "tags": ["a", "b"],
            "nested": { "ref": oid },
        }));

        assert_eq!(
            rendered,
            json!({
                "_id": "65a1f0c2e4b0a1b2c3d4e5f6",
                "tags": ["a", "b"],
                "nested": { "ref": "65a1f0c2e4b0a1b2c3d4e5f6" }
            })
        );
    }

    #[test]
    fn numbers_stay_plain() {
        let rendered = bson_to_json(Bson::Document(doc! {
            "quantity": 3_i64,
            "price": 9.5,
            "discount": 10_i32,
        }));
        assert_eq!(rendered, json!({ "quantity": 3, "price": 9.5, "discount": 10 }));
    }

    #[test]
    fn dates_render_as_rfc3339() {
        let date = DateTime::from_millis(0);
        assert_eq!(
            bson_to_json(Bson::DateTime(date)),
            json!("1970-01-01T00:00:00Z")
        );
    }

    #[test]
    fn stored_documents_render_whatever_their_field_types() {
        let rendered = documents_to_json(vec![
            doc! { "itemId": 1, "quantity": 2.0, "status": Bson::Null },
            doc! { "itemId": "1", "quantity": 3_i64 },
        ]);
        assert_eq!(
            rendered,
            json!([
                { "itemId": 1, "quantity": 2.0, "status": null },
                { "itemId": "1", "quantity": 3 }
            ])
        );
        assert_eq!(document_to_json(None), Value::Null);
    }

    #[test]
    fn invalid_ids_are_rejected() {
        assert!(parse_object_id("123").is_err());
        assert!(parse_object_id("65a1f0c2e4b0a1b2c3d4e5f6").is_ok());
    }
}
