//! Error handling for atrium-http
//!
//! Maps workspace errors onto HTTP status codes with a `{"error": "..."}` body.

use atrium_core::WorkspaceError;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::cmp::PartialEq;
use tracing::error;

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Error raised by a workspace component
    Workspace(WorkspaceError),

    /// Malformed request that never reached a component
    BadRequest(String),

    /// Request body over the configured limit
    PayloadTooLarge(String),
}

impl From<WorkspaceError> for AppError {
    fn from(err: WorkspaceError) -> Self {
        Self::Workspace(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl PartialEq<StatusCode> for AppError {
    fn eq(&self, status_code: &StatusCode) -> bool {
        &self.status() == status_code
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Workspace(WorkspaceError::Validation { .. }) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Workspace(WorkspaceError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Workspace(WorkspaceError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Workspace(WorkspaceError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// Get the status code and error message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        let message = match self {
            Self::Workspace(WorkspaceError::Store(_)) => "Internal server error".to_string(),
            Self::Workspace(err) => err.to_string(),
            Self::BadRequest(msg) | Self::PayloadTooLarge(msg) => msg.clone(),
        };
        (self.status(), message)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::Workspace(WorkspaceError::Store(err)) = &self {
            error!("Store failure: {}", err);
        }

        let (status, error_message) = self.status_and_message();

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
