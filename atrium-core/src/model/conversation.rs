use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ConversationId, UserId, WorkspaceId};

/// The slice of a conversation visible to the workspace feature.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ConversationRef {
    #[serde(rename = "conversationId")]
    pub conversation_id: ConversationId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub title: String,

    pub user: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<WorkspaceId>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,

    /// Set when the conversation is scheduled for removal
    #[serde(rename = "expiredAt", default, skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
}

/// Keyset query over a user's conversations in one workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationFilter {
    pub owner: UserId,
    pub workspace_id: WorkspaceId,
    /// Inclusive upper bound on `updated_at`: the first record of the page
    pub until: Option<DateTime<Utc>>,
    pub limit: usize,
}

impl ConversationFilter {
    pub fn matches(&self, conversation: &ConversationRef) -> bool {
        conversation.user == self.owner
            && conversation.workspace_id.as_deref() == Some(self.workspace_id.as_str())
            && conversation.expired_at.is_none()
            && self
                .until
                .is_none_or(|cursor| conversation.updated_at <= cursor)
    }
}
