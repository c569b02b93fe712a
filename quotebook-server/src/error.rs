use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quotebook_core::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Failures a request handler can end in. Every variant maps to a status
/// code and a JSON `{ "error": ... }` body.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("The quote could not be found.")]
    QuoteNotFound,

    #[error("The thinker could not be found.")]
    ThinkerNotFound,

    /// Parent of a thinker-scoped quote route.
    #[error("This thinker could not be found.")]
    ParentThinkerNotFound,

    /// Request body missing, not JSON, or not the expected shape. Keeps the
    /// status axum chose (400, 413, 415 or 422).
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("The requested resource could not be found.")]
    RouteNotFound,

    #[error("This method is not allowed on this resource.")]
    MethodNotAllowed,

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Standard HTTP error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::QuoteNotFound
            | ApiError::ThinkerNotFound
            | ApiError::ParentThinkerNotFound
            | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::InvalidBody { status, .. } => *status,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "Storage operation failed");
                ErrorResponse::new("An internal error occurred.")
            }
            other => ErrorResponse::new(other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(ApiError::QuoteNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::ThinkerNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::ParentThinkerNotFound.status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::RouteNotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_body_keeps_rejection_status() {
        let err = ApiError::InvalidBody {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            err.to_string(),
            "Expected request with `Content-Type: application/json`"
        );
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[test]
    fn storage_failure_maps_to_500_without_leaking_details() {
        let err = ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(
            ApiError::QuoteNotFound.to_string(),
            "The quote could not be found."
        );
        assert_eq!(
            ApiError::ThinkerNotFound.to_string(),
            "The thinker could not be found."
        );
        assert_eq!(
            ApiError::ParentThinkerNotFound.to_string(),
            "This thinker could not be found."
        );
    }
}
