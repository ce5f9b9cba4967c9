//! Error types for the Shastra Chat service
//!
//! Provides:
//! - Distinct error types for different failure modes
//! - HTTP status code mapping
//! - A wire response body that never leaks upstream diagnostic detail
//!
//! Note that an empty retrieval context is NOT an error anywhere in this
//! taxonomy: the refusal branch is a normal, successful outcome handled by
//! the chat pipeline.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error classification (logs only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    ValidationError,
    MissingField,

    // Authentication errors (2xxx)
    Unauthorized,
    InvalidToken,
    ExpiredToken,

    // Database errors (7xxx)
    DatabaseError,
    RetrievalUnavailable,

    // External service errors (8xxx)
    CompletionServiceError,
    UpstreamError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            // Validation (1xxx)
            ErrorCode::ValidationError => 1001,
            ErrorCode::MissingField => 1002,

            // Auth (2xxx)
            ErrorCode::Unauthorized => 2001,
            ErrorCode::InvalidToken => 2002,
            ErrorCode::ExpiredToken => 2003,

            // Database (7xxx)
            ErrorCode::DatabaseError => 7001,
            ErrorCode::RetrievalUnavailable => 7002,

            // External (8xxx)
            ErrorCode::CompletionServiceError => 8001,
            ErrorCode::UpstreamError => 8002,

            // Internal (9xxx)
            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors; the message renders bare because clients match on
    // the exact wire text (e.g. "Query is required")
    #[error("{message}")]
    Validation { message: String },

    #[error("Required field missing: {field}")]
    MissingField { field: String },

    // Authentication errors
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Scripture store unavailable: {message}")]
    RetrievalUnavailable { message: String },

    // External service errors
    #[error("Completion service error {status}: {body}")]
    CompletionService { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::MissingField { .. } => ErrorCode::MissingField,
            AppError::Unauthorized { .. } => ErrorCode::Unauthorized,
            AppError::InvalidToken => ErrorCode::InvalidToken,
            AppError::ExpiredToken => ErrorCode::ExpiredToken,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::RetrievalUnavailable { .. } => ErrorCode::RetrievalUnavailable,
            AppError::CompletionService { .. } => ErrorCode::CompletionServiceError,
            AppError::HttpClient(_) => ErrorCode::UpstreamError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation { .. } |
            AppError::MissingField { .. } => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            AppError::Unauthorized { .. } |
            AppError::InvalidToken |
            AppError::ExpiredToken => StatusCode::UNAUTHORIZED,

            // 500 Internal Server Error
            AppError::Database(_) |
            AppError::Internal { .. } |
            AppError::Configuration { .. } |
            AppError::Serialization(_) |
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,

            // 502 Bad Gateway
            AppError::CompletionService { .. } |
            AppError::HttpClient(_) => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            AppError::RetrievalUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Client errors carry their real message; server-side failures
    /// (store unreachable, completion service errors) collapse to a generic
    /// message, with the detail kept in logs only.
    pub fn public_message(&self) -> String {
        if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Wire-level error body: `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();
        let detail = self.to_string();

        // Full detail goes to logs; the response body stays generic for 5xx
        if self.is_server_error() {
            tracing::error!(
                error = %detail,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %detail,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = AppError::Validation {
            message: "Query is required".into(),
        };
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.is_client_error());
        // Exact wire text, no prefix: clients match on this message
        assert_eq!(err.public_message(), "Query is required");
    }

    #[test]
    fn test_completion_error_not_leaked() {
        let err = AppError::CompletionService {
            status: 429,
            body: "rate limited by upstream, key sk-abc".into(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.is_server_error());
        // Upstream body must never reach the caller
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_retrieval_unavailable() {
        let err = AppError::RetrievalUnavailable {
            message: "connection refused".into(),
        };
        assert_eq!(err.code(), ErrorCode::RetrievalUnavailable);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_error_code_numbering() {
        assert_eq!(ErrorCode::ValidationError.as_code(), 1001);
        assert_eq!(ErrorCode::CompletionServiceError.as_code(), 8001);
    }
}
