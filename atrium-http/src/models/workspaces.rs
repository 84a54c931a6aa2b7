use std::collections::BTreeMap;

use atrium_core::error::{WorkspaceError, WorkspaceResult};
use atrium_core::model::{ConversationRef, FileId, Workspace};
use atrium_core::services::{ContextUsage, ConversationPage, FileAction, WorkspaceListing};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

/// Workspace creation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateWorkspaceRequest {
    /// Display name; trimmed, must not be blank
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Prepended to the prompt of new conversations in this workspace
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Partial workspace update
///
/// Unknown fields are ignored. An explicit `null` or empty string clears
/// `description` and `instructions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateWorkspaceRequest {
    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,

    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[serde(default, with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub instructions: Option<Option<String>>,
}

impl UpdateWorkspaceRequest {
    /// Present name; `Some("")` for an explicit null so it fails as blank
    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().map(|n| n.as_deref().unwrap_or(""))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().map(|d| d.as_deref().unwrap_or(""))
    }

    pub fn instructions(&self) -> Option<&str> {
        self.instructions
            .as_ref()
            .map(|i| i.as_deref().unwrap_or(""))
    }
}

/// Query parameters for listing workspaces
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListWorkspacesQuery {
    /// 1-based page number
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,

    /// Page size, capped at the configured maximum
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
}

impl ListWorkspacesQuery {
    pub fn page(&self) -> Option<usize> {
        self.page.as_deref().and_then(parse_leading_int)
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(parse_leading_int)
    }
}

/// Query parameters for listing a workspace's conversations
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversationsQuery {
    /// Page size, capped at the configured maximum
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,

    /// `nextCursor` from the previous page
    pub cursor: Option<String>,
}

impl ConversationsQuery {
    pub fn limit(&self) -> Option<usize> {
        self.limit.as_deref().and_then(parse_leading_int)
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Leading decimal digits of a query value; `"12abc"` reads as 12, `"abc"` as nothing.
pub fn parse_leading_int(raw: &str) -> Option<usize> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListWorkspacesResponse {
    pub workspaces: Vec<Workspace>,
    pub pagination: Pagination,
}

impl From<WorkspaceListing> for ListWorkspacesResponse {
    fn from(listing: WorkspaceListing) -> Self {
        Self {
            workspaces: listing.workspaces,
            pagination: Pagination {
                page: listing.page,
                limit: listing.limit,
                total: listing.total,
                pages: listing.pages,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationsResponse {
    pub conversations: Vec<ConversationRef>,

    /// `null` on the last page
    pub next_cursor: Option<String>,
}

impl From<ConversationPage> for ConversationsResponse {
    fn from(page: ConversationPage) -> Self {
        Self {
            conversations: page.conversations,
            next_cursor: page.next_cursor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContextBreakdown {
    pub instructions: u64,
    pub files: u64,
}

/// Token estimate for a workspace's context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub token_count: u64,
    pub breakdown: ContextBreakdown,
    /// Estimate per file, only for files with a positive estimate
    pub file_tokens: BTreeMap<FileId, u64>,
    /// Bytes of files that could not be estimated
    pub unknown_bytes: u64,
}

impl From<ContextUsage> for ContextResponse {
    fn from(usage: ContextUsage) -> Self {
        Self {
            token_count: usage.total_tokens,
            breakdown: ContextBreakdown {
                instructions: usage.instructions_tokens,
                files: usage.files_tokens,
            },
            file_tokens: usage.per_file_tokens,
            unknown_bytes: usage.unknown_bytes,
        }
    }
}

/// Add or remove file references
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ManageFilesRequest {
    /// `"add"` or `"remove"`
    #[serde(default)]
    #[schema(value_type = FileAction)]
    pub action: Option<String>,

    /// Non-empty list of file ids
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub file_ids: Option<Value>,
}

impl ManageFilesRequest {
    /// Validate the raw body into an action and a list of ids.
    pub fn parse(&self) -> WorkspaceResult<(FileAction, Vec<FileId>)> {
        let file_ids = match &self.file_ids {
            Some(Value::Array(items)) if !items.is_empty() => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .ok_or_else(|| {
                    WorkspaceError::validation("file_ids", "file_ids must contain only strings")
                })?,
            _ => {
                return Err(WorkspaceError::validation(
                    "file_ids",
                    "file_ids must be a non-empty array",
                ));
            }
        };

        let action = self.action.as_deref().unwrap_or_default().parse()?;
        Ok((action, file_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("20"), Some(20));
        assert_eq!(parse_leading_int(" 7abc"), Some(7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-3"), None);
    }

    #[test]
    fn test_update_request_distinguishes_null_and_missing() {
        let req: UpdateWorkspaceRequest =
            serde_json::from_value(json!({"description": null, "owner": "mallory"})).unwrap();
        assert_eq!(req.name(), None);
        assert_eq!(req.description(), Some(""));
        assert_eq!(req.instructions(), None);
    }

    #[test]
    fn test_manage_files_validation() {
        let parse = |body: Value| {
            serde_json::from_value::<ManageFilesRequest>(body)
                .unwrap()
                .parse()
        };

        let (action, ids) = parse(json!({"action": "add", "file_ids": ["a", "b"]})).unwrap();
        assert_eq!(action, FileAction::Add);
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);

        for body in [
            json!({"action": "add", "file_ids": []}),
            json!({"action": "add", "file_ids": "a"}),
            json!({"action": "add"}),
        ] {
            let err = parse(body).unwrap_err();
            assert!(matches!(err, WorkspaceError::Validation { field: "file_ids", .. }));
        }

        let err = parse(json!({"action": "toggle", "file_ids": ["a"]})).unwrap_err();
        assert_eq!(err.to_string(), r#"Invalid action. Must be "add" or "remove""#);
    }
}
