use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Value, json};

use crate::error::AppError;

/// Request bodies pass through unvalidated, so they arrive as loose JSON and
/// are stored field for field.
pub fn json_to_document(value: &Value) -> Result<Document, AppError> {
    Ok(bson::to_document(value)?)
}

pub fn documents_to_json(documents: Vec<Document>) -> Value {
    Value::Array(documents.into_iter().map(document_to_json).collect())
}

/// Stored document as the frontend sees it: ObjectIds collapse to their
/// 24-char hex string, everything else keeps its JSON shape.
pub fn document_to_json(document: Document) -> Value {
    Value::Object(
        document
            .into_iter()
            .map(|(key, value)| (key, bson_to_json(value)))
            .collect::<Map<String, Value>>(),
    )
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}

/// `{success, result}` envelope most routes answer with.
pub fn success(result: Value) -> Value {
    json!({
        "success": true,
        "result": result,
    })
}

pub fn insert_ack(inserted_id: Bson) -> Value {
    json!({
        "acknowledged": true,
        "insertedId": bson_to_json(inserted_id),
    })
}

pub fn update_ack(matched: u64, modified: u64, upserted_id: Option<Bson>) -> Value {
    let upserted = upserted_id.map(bson_to_json);
    let upserted_count = u64::from(upserted.is_some());

    json!({
        "acknowledged": true,
        "matchedCount": matched,
        "modifiedCount": modified,
        "upsertedCount": upserted_count,
        "upsertedId": upserted,
    })
}

pub fn delete_ack(deleted: u64) -> Value {
    json!({
        "acknowledged": true,
        "deletedCount": deleted,
    })
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{Bson, doc, oid::ObjectId};
    use serde_json::json;

    use super::{delete_ack, document_to_json, insert_ack, json_to_document, success, update_ack};

    #[test]
    fn test_object_ids_collapse_to_hex() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "category": "road",
            "nested": { "ref": id },
            "tags": [id, "cleanup"],
        };

        assert_eq!(
            document_to_json(document),
            json!({
                "_id": id.to_hex(),
                "category": "road",
                "nested": { "ref": id.to_hex() },
                "tags": [id.to_hex(), "cleanup"],
            })
        );
    }

    #[test]
    fn test_plain_fields_keep_their_shape() {
        let document = doc! {
            "votes": 3_i32,
            "open": true,
            "note": Bson::Null,
        };

        assert_eq!(
            document_to_json(document),
            json!({ "votes": 3, "open": true, "note": null })
        );
    }

    #[test]
    fn test_json_round_trips_into_document() {
        let body = json!({ "category": "water", "status": "open", "severity": 2 });

        let document = json_to_document(&body).unwrap();

        assert_eq!(document.get_str("category").unwrap(), "water");
        assert_eq!(document_to_json(document), body);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(json_to_document(&json!("just a string")).is_err());
    }

    #[test]
    fn test_insert_ack_shape() {
        let id = ObjectId::new();

        assert_eq!(
            insert_ack(Bson::ObjectId(id)),
            json!({ "acknowledged": true, "insertedId": id.to_hex() })
        );
    }

    #[test]
    fn test_update_ack_without_upsert() {
        assert_eq!(
            update_ack(1, 1, None),
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 1,
                "upsertedCount": 0,
                "upsertedId": null,
            })
        );
    }

    #[test]
    fn test_update_ack_with_upsert() {
        let id = ObjectId::new();

        assert_eq!(
            update_ack(0, 0, Some(Bson::ObjectId(id))),
            json!({
                "acknowledged": true,
                "matchedCount": 0,
                "modifiedCount": 0,
                "upsertedCount": 1,
                "upsertedId": id.to_hex(),
            })
        );
    }

    #[test]
    fn test_delete_ack_shape() {
        assert_eq!(
            delete_ack(1),
            json!({ "acknowledged": true, "deletedCount": 1 })
        );
    }

    #[test]
    fn test_success_envelope() {
        assert_eq!(
            success(json!(null)),
            json!({ "success": true, "result": null })
        );
    }
}
