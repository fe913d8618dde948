//! User routes. Users are keyed by email and written through an upsert on
//! every login, so the same route both creates and refreshes a profile.
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use mongodb::bson::{Document, doc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{database::USERS, error::AppError, state::AppState, utils::update_ack};

#[derive(Deserialize)]
pub struct SaveUserRequest {
    pub email: String,
    pub name: String,
    #[serde(rename = "photoURL")]
    pub photo_url: String,
}

/// Role stored on a user document; anyone never saved (or saved without a
/// role) is a plain `user`.
pub fn role_of(user: Option<&Document>) -> &str {
    user.and_then(|document| document.get_str("role").ok())
        .unwrap_or("user")
}

/// Upsert document for save-user. Always writes `role: "user"`, so saving a
/// promoted user's profile resets them back to a regular user.
pub fn save_user_update(request: &SaveUserRequest) -> Document {
    doc! {
        "$set": {
            "email": request.email.as_str(),
            "name": request.name.as_str(),
            "photoURL": request.photo_url.as_str(),
            "role": "user",
        }
    }
}

pub async fn user_role_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state
        .db
        .collection::<Document>(USERS)
        .find_one(doc! { "email": email.as_str() })
        .await?;

    Ok(Json(json!({ "role": role_of(user.as_ref()) })))
}

pub async fn save_user_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SaveUserRequest>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .db
        .collection::<Document>(USERS)
        .update_one(
            doc! { "email": request.email.as_str() },
            save_user_update(&request),
        )
        .upsert(true)
        .await?;

    Ok(Json(update_ack(
        result.matched_count,
        result.modified_count,
        result.upserted_id,
    )))
}

/// No caller-identity check here: any client can promote any email.
pub async fn make_admin_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = state
        .db
        .collection::<Document>(USERS)
        .update_one(
            doc! { "email": email.as_str() },
            doc! { "$set": { "role": "admin" } },
        )
        .await?;

    Ok(Json(update_ack(
        result.matched_count,
        result.modified_count,
        result.upserted_id,
    )))
}
