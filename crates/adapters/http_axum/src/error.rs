//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use inventory_domain::error::InventoryError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`InventoryError`] and request extraction failures to an HTTP
/// response with the matching status code.
#[derive(Debug)]
pub enum ApiError {
    Inventory(InventoryError),
    /// The request could not be read: malformed JSON, bad query string or a
    /// non-numeric id in the path.
    BadRequest(String),
}

impl ApiError {
    /// Status code and caller-facing message.
    ///
    /// Storage failures are logged here and replaced by a generic message.
    pub(crate) fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Self::Inventory(InventoryError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Inventory(InventoryError::InvalidState(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::Inventory(InventoryError::NotFound(err)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            Self::Inventory(InventoryError::Conflict(err)) => {
                (StatusCode::CONFLICT, err.to_string())
            }
            Self::Inventory(InventoryError::Storage(err)) => {
                tracing::error!(error = %err, source = ?err, "storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message.clone()),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        Self::Inventory(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
