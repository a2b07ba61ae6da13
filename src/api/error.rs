//! Error classifier: the single mapping from every failure source to a
//! stable `(status, JSON body)` pair.
//!
//! Responses carry `{ "error": <message> }`, plus a `details` map for
//! aggregate validation failures. Internal detail stays in the server
//! log; the client only ever sees the classified message.

use std::collections::BTreeMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::auth::AuthError;
use crate::db::DatabaseError;
use crate::documents::DocumentError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ── Auth gate ────────────────────────────────────────────
    #[error("No token provided")]
    NoTokenProvided,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("Not authorized")]
    NotAuthorized,
    #[error("Not authorized to access this route")]
    Forbidden,

    // ── Document lifecycle ───────────────────────────────────
    #[error("Document not found")]
    DocumentNotFound,
    #[error("No extractions found for this document")]
    NoExtractionsFound,
    #[error("File path not found")]
    FilePathNotFound,
    #[error("File not found on disk")]
    FileNotFoundOnDisk,
    #[error("Error sending file")]
    FileSendError,
    #[error("No file uploaded")]
    NoFileUploaded,
    #[error("Only PDF files are allowed")]
    OnlyPdfAllowed,

    // ── Request/boundary failures ────────────────────────────
    #[error("{0}")]
    BadRequest(String),
    #[error("File size too large. Maximum size is 100MB")]
    FileTooLarge,
    #[error("File upload error")]
    UploadError,
    #[error("Invalid JSON")]
    InvalidJson,

    // ── Infrastructure-shaped classifier rows ────────────────
    #[error("Validation Error")]
    Validation(BTreeMap<String, String>),
    #[error("Invalid {field}: {value}")]
    InvalidField { field: String, value: String },
    #[error("Duplicate field value: {field}")]
    DuplicateField { field: String },
    #[error("Internal server error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, String>>,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NoTokenProvided
            | Self::InvalidCredentials
            | Self::InvalidToken
            | Self::UserNotFound
            | Self::NotAuthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::DocumentNotFound
            | Self::NoExtractionsFound
            | Self::FilePathNotFound
            | Self::FileNotFoundOnDisk => StatusCode::NOT_FOUND,
            Self::NoFileUploaded
            | Self::OnlyPdfAllowed
            | Self::BadRequest(_)
            | Self::FileTooLarge
            | Self::UploadError => StatusCode::BAD_REQUEST,
            Self::FileSendError
            | Self::InvalidJson
            | Self::Validation(_)
            | Self::InvalidField { .. }
            | Self::DuplicateField { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Every classified error is logged before the response exists.
        // Internal detail (the wrapped source message) never leaves the log.
        if status.is_server_error() {
            tracing::error!(kind = ?self, status = %status, "Request failed: {self}");
        } else {
            tracing::warn!(kind = ?self, status = %status, "Request rejected: {self}");
        }

        let details = match &self {
            Self::Validation(details) => Some(details.clone()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        if let Some(field) = err.unique_violation_field() {
            return Self::DuplicateField {
                field: field.to_string(),
            };
        }
        Self::Internal(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::InvalidToken => Self::InvalidToken,
            AuthError::Validation(details) => Self::Validation(details),
            AuthError::Database(e) => e.into(),
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound => Self::DocumentNotFound,
            DocumentError::NoExtractions => Self::NoExtractionsFound,
            DocumentError::NoFileUploaded => Self::NoFileUploaded,
            DocumentError::OnlyPdfAllowed => Self::OnlyPdfAllowed,
            DocumentError::FilePathNotFound => Self::FilePathNotFound,
            DocumentError::FileNotFoundOnDisk => Self::FileNotFoundOnDisk,
            DocumentError::InvalidId(value) => Self::InvalidField {
                field: "id".into(),
                value,
            },
            DocumentError::Database(e) => e.into(),
        }
    }
}
