use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FileId, UserId};

/// A file owned by the upload pipeline and referenced by workspaces.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FileRecord {
    pub file_id: FileId,

    /// Owning user
    pub user: UserId,

    pub filename: String,

    #[serde(default)]
    pub filepath: String,

    /// MIME type
    #[serde(rename = "type", default)]
    pub mime_type: String,

    /// Size in bytes
    #[serde(default)]
    pub bytes: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// Extracted text; only present when requested with [`FileProjection::WithText`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(rename = "createdAt", default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt", default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// Pixel dimensions when both are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    pub fn without_text(mut self) -> Self {
        self.text = None;
        self
    }
}

/// Whether extracted text is returned with file records.
///
/// Text is excluded unless a caller asks for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileProjection {
    #[default]
    WithoutText,
    WithText,
}
