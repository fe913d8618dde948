use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed identifier: {0}")]
    MalformedId(#[from] bson::oid::Error),

    #[error("Malformed document: {0}")]
    MalformedDocument(#[from] bson::ser::Error),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Every failure surfaces as an opaque 500; a missing document is a
        // success-shaped null result, never an error.
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use mongodb::bson::oid::ObjectId;

    use super::AppError;

    #[test]
    fn test_malformed_id_is_opaque_500() {
        let error = AppError::from(ObjectId::parse_str("not-hex").unwrap_err());

        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
