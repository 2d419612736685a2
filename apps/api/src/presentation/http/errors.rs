//! HTTP error handling and response conversion.
//!
//! Handlers return [`AppError`] explicitly; every variant maps to exactly one
//! status code, so no failure falls through to a framework catch-all.

use crate::domain::conversion::errors::ConversionError;
use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;
use ts_rs::TS;

/// Application-level errors returned from handlers.
#[derive(Debug)]
pub enum AppError {
    /// No usable file part in the request (400).
    MalformedInput(String),

    /// Request body exceeded the configured limit (413).
    PayloadTooLarge,

    /// The converter rejected the upload (500).
    ConversionFailed(String),

    /// Unclassified internal error (500).
    Internal(String),
}

/// Machine-readable error category sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ErrorKind {
    MalformedInput,
    PayloadTooLarge,
    ConversionFailed,
    Internal,
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: ErrorKind,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            Self::PayloadTooLarge => write!(f, "Payload too large"),
            Self::ConversionFailed(msg) => write!(f, "Conversion failed: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl AppError {
    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ConversionFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::PayloadTooLarge => ErrorKind::PayloadTooLarge,
            Self::ConversionFailed(_) => ErrorKind::ConversionFailed,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Get a user-safe error message (without implementation details).
    fn user_message(&self) -> String {
        match self {
            Self::MalformedInput(msg) => msg.clone(),
            Self::PayloadTooLarge => "Uploaded file is too large".into(),
            Self::ConversionFailed(msg) => msg.clone(),
            Self::Internal(_) => "Internal server error".into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => tracing::error!("error={}", self),
            _ => tracing::warn!("error={}", self),
        }

        let body = ErrorResponse {
            error: self.user_message(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

// === Conversion Error Conversion ===

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::Worker(msg) => AppError::Internal(msg),
            other => {
                if !other.is_content_error() {
                    tracing::error!(conversion_error = %other, "Converter I/O failure");
                }
                AppError::ConversionFailed(other.to_string())
            }
        }
    }
}

// === Multipart Error Conversion ===

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::MalformedInput(err.body_text())
        }
    }
}
