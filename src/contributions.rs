//! Contribution routes. Contributions are insert-only: they get created from
//! the issue detail modal and read back filtered by issue or contributor.
//! The `issueId` field is a weak reference, nothing checks the issue exists.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use futures::TryStreamExt;
use mongodb::bson::Document;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    database::CONTRIBUTIONS,
    error::AppError,
    state::AppState,
    utils::{documents_to_json, insert_ack, json_to_document, success},
};

#[derive(Deserialize)]
pub struct ContributionFilter {
    pub email: Option<String>,
}

#[derive(Deserialize)]
pub struct IssueRef {
    #[serde(rename = "issueId")]
    pub issue_id: Option<String>,
}

pub fn contribution_filter(filter: &ContributionFilter) -> Document {
    let mut document = Document::new();

    if let Some(email) = &filter.email {
        document.insert("email", email.as_str());
    }

    document
}

pub fn issue_ref_filter(filter: &IssueRef) -> Document {
    let mut document = Document::new();

    if let Some(issue_id) = &filter.issue_id {
        document.insert("issueId", issue_id.as_str());
    }

    document
}

pub async fn create_contribution_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .db
        .collection::<Document>(CONTRIBUTIONS)
        .insert_one(json_to_document(&body)?)
        .await?;

    Ok(Json(success(insert_ack(result.inserted_id))))
}

pub async fn list_contributions_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<ContributionFilter>,
) -> Result<Json<Value>, AppError> {
    let contributions: Vec<Document> = state
        .db
        .collection::<Document>(CONTRIBUTIONS)
        .find(contribution_filter(&filter))
        .await?
        .try_collect()
        .await?;

    Ok(Json(success(documents_to_json(contributions))))
}

pub async fn contributions_by_issue_handler(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<IssueRef>,
) -> Result<Json<Value>, AppError> {
    let contributions: Vec<Document> = state
        .db
        .collection::<Document>(CONTRIBUTIONS)
        .find(issue_ref_filter(&filter))
        .await?
        .try_collect()
        .await?;

    Ok(Json(success(documents_to_json(contributions))))
}

#[cfg(test)]
mod tests {
    use mongodb::bson::doc;

    use super::{ContributionFilter, IssueRef, contribution_filter, issue_ref_filter};

    #[test]
    fn test_email_filter() {
        let filter = ContributionFilter {
            email: Some("a@x.com".to_string()),
        };

        assert_eq!(contribution_filter(&filter), doc! { "email": "a@x.com" });
    }

    #[test]
    fn test_missing_email_lists_all() {
        assert_eq!(contribution_filter(&ContributionFilter { email: None }), doc! {});
    }

    #[test]
    fn test_issue_ref_filter() {
        let filter = IssueRef {
            issue_id: Some("65f0a1b2c3d4e5f6a7b8c9d0".to_string()),
        };

        assert_eq!(
            issue_ref_filter(&filter),
            doc! { "issueId": "65f0a1b2c3d4e5f6a7b8c9d0" }
        );
    }
}
