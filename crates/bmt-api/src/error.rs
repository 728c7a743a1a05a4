//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps ticket lifecycle and store errors to HTTP status codes and returns
//! JSON error bodies with a machine-readable code and a message.
//! Persistence failure details are never exposed in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use bmt_core::TicketIdError;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CAPACITY_EXCEEDED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// The variants are exactly the failure modes the ticket API can surface;
/// none are retried internally — retries, if desired, are the caller's
/// responsibility.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed ticket identifier (400).
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// No record matches the identifier (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed request body, e.g. a non-boolean advertise flag (400).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// All advertisement slots are occupied (400).
    #[error("maximum {cap} tickets can be advertised at a time")]
    CapacityExceeded { cap: usize },

    /// Bearer token missing or invalid (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// Backing store unreachable or failed (500). Message is logged but
    /// not returned to the client.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
            Self::CapacityExceeded { .. } => (StatusCode::BAD_REQUEST, "CAPACITY_EXCEEDED"),
            Self::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
            Self::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose persistence error details to clients.
        let message = match &self {
            Self::Persistence(_) => "A persistence error occurred".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        if let Self::Persistence(_) = &self {
            tracing::error!(error = %self, "persistence failure");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<TicketIdError> for AppError {
    fn from(err: TicketIdError) -> Self {
        Self::InvalidId(err.to_string())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_id_status_code() {
        let err = AppError::InvalidId("bad-id".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_ID");
    }

    #[test]
    fn not_found_status_code() {
        let err = AppError::NotFound("ticket missing".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn invalid_argument_status_code() {
        let err = AppError::InvalidArgument("isAdvertised must be a boolean".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_ARGUMENT");
    }

    #[test]
    fn capacity_exceeded_status_code() {
        let err = AppError::CapacityExceeded { cap: 6 };
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "CAPACITY_EXCEEDED");
        assert!(err.to_string().contains('6'));
    }

    #[test]
    fn unauthenticated_status_code() {
        let err = AppError::Unauthenticated("no token".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHENTICATED");
    }

    #[test]
    fn persistence_status_code() {
        let err = AppError::Persistence("db connection failed".to_string());
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "PERSISTENCE_ERROR");
    }

    #[test]
    fn ticket_id_error_converts_to_invalid_id() {
        let parse_err = bmt_core::TicketId::parse("garbage").unwrap_err();
        let app_err = AppError::from(parse_err);
        let (status, code) = app_err.status_and_code();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, "INVALID_ID");
        assert!(app_err.to_string().contains("garbage"));
    }

    // ── into_response tests ──────────────────────────────────────

    use http_body_util::BodyExt;

    /// Helper to extract status and body from a Response.
    async fn response_parts(err: AppError) -> (StatusCode, ErrorBody) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        (status, body)
    }

    #[tokio::test]
    async fn into_response_not_found() {
        let (status, body) = response_parts(AppError::NotFound("ticket 123".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.code, "NOT_FOUND");
        assert!(body.error.message.contains("ticket 123"));
    }

    #[tokio::test]
    async fn into_response_capacity_exceeded() {
        let (status, body) = response_parts(AppError::CapacityExceeded { cap: 6 }).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error.code, "CAPACITY_EXCEEDED");
        assert!(body.error.message.contains("maximum 6"));
    }

    #[tokio::test]
    async fn into_response_persistence_hides_details() {
        let (status, body) =
            response_parts(AppError::Persistence("db connection failed".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.code, "PERSISTENCE_ERROR");
        // The persistence error message must NOT appear in the response body.
        assert!(
            !body.error.message.contains("db connection"),
            "persistence details must not leak: {}",
            body.error.message
        );
        assert_eq!(body.error.message, "A persistence error occurred");
    }

    #[tokio::test]
    async fn into_response_unauthenticated() {
        let (status, body) = response_parts(AppError::Unauthenticated("no token".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body.error.code, "UNAUTHENTICATED");
        assert!(body.error.message.contains("no token"));
    }
}
