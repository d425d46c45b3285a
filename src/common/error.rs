//! Error types for minipost

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Validation Errors ===
    #[error("Incorrect payload")]
    InvalidPayload,

    #[error("Payload too large")]
    PayloadTooLarge,

    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Post with ID #{0} not found")]
    PostNotFound(String),

    // === Configuration Errors ===
    #[error("{0}")]
    PeerNotConfigured(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Network Errors ===
    #[error("{service} service unreachable: {reason}")]
    Upstream { service: String, reason: String },

    // === Store Errors ===
    #[error("Store error: {0}")]
    Store(String),

    #[cfg(feature = "sled-backend")]
    #[error("Sled error: {0}")]
    Sled(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn upstream(service: impl Into<String>, reason: impl ToString) -> Self {
        Error::Upstream {
            service: service.into(),
            reason: reason.to_string(),
        }
    }

    /// Rejections of a well-formed request. These answer with `{"msg": ..}`
    /// instead of `{"error": ..}`.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Error::PostNotFound(_) | Error::PeerNotConfigured(_))
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> StatusCode {
        match self {
            Error::InvalidPayload
            | Error::InvalidId(_)
            | Error::PostNotFound(_)
            | Error::PeerNotConfigured(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.to_http_status();
        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "{}", message);
        }

        let body = if self.is_rejection() {
            json!({ "msg": message })
        } else {
            json!({ "error": message })
        };
        (status, Json(body)).into_response()
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}

impl From<axum::extract::rejection::JsonRejection> for Error {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge
        } else {
            Error::InvalidPayload
        }
    }
}
