//! Custom error types for the API service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::StoreError;
use common::id::InvalidId;
use common::page::PageParamError;
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed entity identifier, rejected before any store access
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(#[from] InvalidId),

    /// Missing or malformed required field
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Authenticated caller is not authorized for this entity
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Uniqueness violation not resolved by toggle logic
    #[error("conflict: {0}")]
    Conflict(String),

    /// Underlying store call failed
    #[error("data access failure")]
    DataAccess(#[source] StoreError),
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidIdentifier(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::DataAccess(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { detail, .. } => ApiError::Conflict(detail),
            other => ApiError::DataAccess(other),
        }
    }
}

impl From<PageParamError> for ApiError {
    fn from(err: PageParamError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("video").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Forbidden("not the owner").status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Conflict("duplicate like".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::DataAccess(StoreError::Backend("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_identifier_is_client_error() {
        let err = ApiError::from(common::id::ObjectId::parse("nope").unwrap_err());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_duplicate_store_error_becomes_conflict() {
        let err = ApiError::from(StoreError::Duplicate {
            collection: "likes",
            detail: "already liked".into(),
        });
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::NotFound("channel").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
