//! Issue routes. Issues are schema-less documents, so handlers move loose
//! JSON in and out and never validate fields.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    database::{ISSUES, LATEST_ISSUES_LIMIT},
    error::AppError,
    state::AppState,
    utils::{
        delete_ack, document_to_json, documents_to_json, insert_ack, json_to_document, success,
        update_ack,
    },
};

#[derive(Deserialize)]
pub struct IssueFilter {
    pub category: Option<String>,
    pub status: Option<String>,
}

/// Equality filter from the provided query fields only; nothing provided
/// matches the whole collection.
pub fn issue_filter(filter: &IssueFilter) -> Document {
    let mut document = Document::new();

    if let Some(category) = &filter.category {
        document.insert("category", category.as_str());
    }
    if let Some(status) = &filter.status {
        document.insert("status", status.as_str());
    }

    document
}

/// `$set` of exactly the caller's fields, merged onto the matched document.
pub fn merge_update(body: &Value) -> Result<Document, AppError> {
    Ok(doc! { "$set": json_to_document(body)? })
}

pub async fn list_issues_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<IssueFilter>,
) -> Result<Json<Value>, AppError> {
    let issues: Vec<Document> = state
        .db
        .collection::<Document>(ISSUES)
        .find(issue_filter(&filter))
        .await?
        .try_collect()
        .await?;

    Ok(Json(documents_to_json(issues)))
}

pub async fn issue_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let object_id = ObjectId::parse_str(&id)?;

    let result = state
        .db
        .collection::<Document>(ISSUES)
        .find_one(doc! { "_id": object_id })
        .await?;

    Ok(Json(success(
        result.map(document_to_json).unwrap_or(Value::Null),
    )))
}

pub async fn create_issue_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .db
        .collection::<Document>(ISSUES)
        .insert_one(json_to_document(&body)?)
        .await?;

    Ok(Json(success(insert_ack(result.inserted_id))))
}

pub async fn update_issue_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let object_id = ObjectId::parse_str(&id)?;

    let result = state
        .db
        .collection::<Document>(ISSUES)
        .update_one(doc! { "_id": object_id }, merge_update(&body)?)
        .await?;

    Ok(Json(success(update_ack(
        result.matched_count,
        result.modified_count,
        result.upserted_id,
    ))))
}

pub async fn delete_issue_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let object_id = ObjectId::parse_str(&id)?;

    let result = state
        .db
        .collection::<Document>(ISSUES)
        .delete_one(doc! { "_id": object_id })
        .await?;

    Ok(Json(success(delete_ack(result.deleted_count))))
}

pub async fn my_issues_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let issues: Vec<Document> = state
        .db
        .collection::<Document>(ISSUES)
        .find(doc! { "email": email.as_str() })
        .await?
        .try_collect()
        .await?;

    Ok(Json(success(documents_to_json(issues))))
}

pub async fn latest_issues_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let issues: Vec<Document> = state
        .db
        .collection::<Document>(ISSUES)
        .find(doc! {})
        .sort(doc! { "date": -1 })
        .limit(LATEST_ISSUES_LIMIT)
        .await?
        .try_collect()
        .await?;

    Ok(Json(documents_to_json(issues)))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;
    use serde_json::json;

    use super::{IssueFilter, issue_filter, merge_update};

    #[test]
    fn test_filter_from_both_fields() {
        let filter = IssueFilter {
            category: Some("road".to_string()),
            status: Some("open".to_string()),
        };

        assert_eq!(
            issue_filter(&filter),
            doc! { "category": "road", "status": "open" }
        );
    }

    #[test]
    fn test_filter_from_one_field() {
        let filter = IssueFilter {
            category: Some("water".to_string()),
            status: None,
        };

        assert_eq!(issue_filter(&filter), doc! { "category": "water" });
    }

    #[test]
    fn test_empty_filter_matches_all() {
        let filter = IssueFilter {
            category: None,
            status: None,
        };

        assert_eq!(issue_filter(&filter), doc! {});
    }

    #[test]
    fn test_empty_string_param_still_filters() {
        let filter = IssueFilter {
            category: Some(String::new()),
            status: None,
        };

        assert_eq!(issue_filter(&filter), doc! { "category": "" });
    }

    #[test]
    fn test_merge_update_wraps_body_in_set() {
        let update = merge_update(&json!({ "status": "closed" })).unwrap();

        assert_eq!(update, doc! { "$set": { "status": "closed" } });
    }
}
