//! Error types shared by the workspace components.

use thiserror::Error;

/// Failures raised by a store backend.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by workspace operations.
///
/// `NotFound` is used both for missing records and for records owned by
/// another user.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl WorkspaceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn workspace_not_found() -> Self {
        Self::NotFound("Workspace not found".to_string())
    }

    pub fn files_not_found() -> Self {
        Self::NotFound("One or more files not found".to_string())
    }
}

pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

/// Errors raised while loading configuration or seed data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
