//! API error taxonomy and the JSON error envelope.
//!
//! Every non-2xx response carries `{success: false, message, error?}` where
//! `error` is an optional debug detail. Validation maps to 400, unknown ids
//! to 404, store and render failures to 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::task::ValidationError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Todo not found")]
    NotFound,

    #[error("{context}")]
    Store {
        context: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Error generating PDF")]
    Render(String),
}

impl ApiError {
    /// Wrap a store error under an operation-specific message, promoting
    /// missing ids to the 404 arm.
    pub fn store(context: &'static str, source: StoreError) -> Self {
        match source {
            StoreError::NotFound => Self::NotFound,
            source => Self::Store { context, source },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.0)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::Validation(_) => (StatusCode::BAD_REQUEST, None),
            Self::NotFound => (StatusCode::NOT_FOUND, None),
            Self::Store { source, .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(source.to_string()))
            }
            Self::Render(detail) => (StatusCode::INTERNAL_SERVER_ERROR, Some(detail.clone())),
        };

        if status.is_server_error() {
            tracing::error!(
                "{self}: {}",
                detail.as_deref().unwrap_or("no further detail")
            );
        }

        let body = ErrorBody {
            success: false,
            message: self.to_string(),
            error: detail,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_promoted_from_store_errors() {
        let err = ApiError::store("Error fetching todo", StoreError::NotFound);
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[test]
    fn validation_keeps_field_message() {
        let err = ApiError::from(ValidationError("Title is required".to_string()));
        assert_eq!(err.to_string(), "Title is required");
    }

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Render("boom".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
