//! # API Error Type
//!
//! What a failed request looks like on the wire.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Mapping                                        │
//! │                                                                         │
//! │  ValidationErrors ─────────────► 400 {"error": "Missing or invalid..."}│
//! │  malformed JSON body ──────────► 400 {"error": "..."}                  │
//! │  DbError::NotFound / bad id ───► 404 {"error": "Item not found"}       │
//! │  any other DbError ────────────► 500 {"error": "<store message>"}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stockroom_core::ValidationErrors;
use stockroom_db::DbError;
use tracing::{error, warn};

/// An HTTP error response with an `{"error": message}` body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn item_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Item not found")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::item_not_found(),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::bad_request(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.message, "Request failed");
        } else {
            warn!(status = %self.status, error = %self.message, "Request rejected");
        }

        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::ValidationError;

    #[test]
    fn test_db_errors_map_to_status() {
        let err: ApiError = DbError::not_found("Item", 7).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Item not found");

        let err: ApiError = DbError::QueryFailed("disk I/O error".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Query failed: disk I/O error");
    }

    #[test]
    fn test_validation_errors_are_bad_request() {
        let errors = ValidationErrors::from(ValidationError::Required {
            field: "name".to_string(),
        });
        let err: ApiError = errors.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Missing or invalid fields: name is required");
    }

    #[test]
    fn test_response_status() {
        let response = ApiError::item_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
