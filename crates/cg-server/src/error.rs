//! JSON error responses for the HTTP API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cg_archive::ArchiveError;
use cg_core::CgError;
use serde_json::json;
use tracing::warn;

/// API error with status code and message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::NOT_FOUND, code: "not_found", message: msg.into() }
    }
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, code: "bad_request", message: msg.into() }
    }
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::UNPROCESSABLE_ENTITY, code: "unprocessable", message: msg.into() }
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, code: "internal_error", message: msg.into() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(code = self.code, message = %self.message, "request failed");
        }
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<CgError> for ApiError {
    fn from(err: CgError) -> Self {
        match &err {
            CgError::IndexOutOfRange { .. } | CgError::UnknownIdentity(_) => ApiError::not_found(err.to_string()),
            CgError::InvalidName(_) | CgError::InvalidSettings(_) => ApiError::bad_request(err.to_string()),
            CgError::Other(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl From<ArchiveError> for ApiError {
    fn from(err: ArchiveError) -> Self {
        match &err {
            ArchiveError::EmptyName { .. }
            | ArchiveError::NameTooLong { .. }
            | ArchiveError::EntryTooLarge { .. }
            | ArchiveError::TooManyEntries(_)
            | ArchiveError::ArchiveTooLarge => ApiError::unprocessable(err.to_string()),
            ArchiveError::Malformed(_) | ArchiveError::Io(_) => ApiError::internal(err.to_string()),
        }
    }
}
