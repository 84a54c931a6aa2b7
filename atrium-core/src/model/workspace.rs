use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{FileId, UserId, WorkspaceId};
use crate::error::{WorkspaceError, WorkspaceResult};

/// A named, user-owned container of instructions and file references.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    /// Unique identifier
    pub id: WorkspaceId,

    /// Display name, always trimmed and non-empty
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Prepended to the prompt prefix of new conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,

    /// Owning user
    #[serde(rename = "user")]
    pub owner: UserId,

    /// File references in insertion order, without duplicates
    #[serde(default)]
    pub files: Vec<FileId>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Build a fresh record from validated input.
    pub fn new(new: NewWorkspace) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            description: new.description,
            instructions: new.instructions,
            owner: new.owner,
            files: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_instructions(&self) -> bool {
        self.instructions.as_deref().is_some_and(|i| !i.is_empty())
    }

    /// Apply an update in place and refresh `updated_at`.
    pub fn apply(&mut self, update: WorkspaceUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = non_empty(description);
        }
        if let Some(instructions) = update.instructions {
            self.instructions = non_empty(instructions);
        }
        if let Some(files) = update.files {
            self.files = files;
        }
        self.updated_at = Utc::now().max(self.updated_at);
    }
}

/// Validated input for creating a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkspace {
    pub owner: UserId,
    pub name: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
}

impl NewWorkspace {
    /// Trim and validate raw input.
    pub fn parse(
        owner: impl Into<UserId>,
        name: Option<&str>,
        description: Option<&str>,
        instructions: Option<&str>,
    ) -> WorkspaceResult<Self> {
        let name = name
            .and_then(normalize_name)
            .ok_or_else(|| WorkspaceError::validation("name", "Workspace name is required"))?;

        Ok(Self {
            owner: owner.into(),
            name,
            description: description.and_then(|d| non_empty(d.trim().to_string())),
            instructions: instructions.and_then(|i| non_empty(i.trim().to_string())),
        })
    }
}

/// Partial update of a workspace record.
///
/// `Some("")` for `description` or `instructions` clears the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub files: Option<Vec<FileId>>,
}

impl WorkspaceUpdate {
    /// Validate the user-editable fields of a PATCH request.
    pub fn fields(
        name: Option<&str>,
        description: Option<&str>,
        instructions: Option<&str>,
    ) -> WorkspaceResult<Self> {
        let name = match name {
            Some(raw) => Some(normalize_name(raw).ok_or_else(|| {
                WorkspaceError::validation("name", "Workspace name cannot be empty")
            })?),
            None => None,
        };

        let update = Self {
            name,
            description: description.map(|d| d.trim().to_string()),
            instructions: instructions.map(|i| i.trim().to_string()),
            files: None,
        };

        if update.is_empty() {
            return Err(WorkspaceError::validation("body", "No valid fields to update"));
        }
        Ok(update)
    }

    pub fn files(files: Vec<FileId>) -> Self {
        Self {
            files: Some(files),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.instructions.is_none()
            && self.files.is_none()
    }
}

/// Trim a workspace name; `None` when nothing is left.
pub fn normalize_name(raw: &str) -> Option<String> {
    non_empty(raw.trim().to_string())
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
