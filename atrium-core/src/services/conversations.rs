//! Cursor pagination over the conversations linked to a workspace.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};

use super::require_workspace;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::model::{ConversationFilter, ConversationRef};
use crate::store::{ConversationStore, OwnerScope, WorkspaceStore};

/// One page of conversations, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationPage {
    pub conversations: Vec<ConversationRef>,
    /// `updated_at` of the first conversation on the next page; `None` at the end
    pub next_cursor: Option<String>,
}

/// Parse an ISO-8601 cursor.
pub fn parse_cursor(raw: &str) -> WorkspaceResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| WorkspaceError::validation("cursor", format!("Invalid cursor: {raw}")))
}

/// Serialize a timestamp as a cursor without losing precision.
pub fn format_cursor(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[derive(Clone)]
pub struct ConversationQuery {
    store: Arc<dyn WorkspaceStore>,
    conversations: Arc<dyn ConversationStore>,
}

impl ConversationQuery {
    pub fn new(store: Arc<dyn WorkspaceStore>, conversations: Arc<dyn ConversationStore>) -> Self {
        Self {
            store,
            conversations,
        }
    }

    /// List the owner's unexpired conversations tagged with the workspace.
    ///
    /// Fetches `limit + 1` rows; the extra row, when present, is not returned
    /// and its `updated_at` becomes the next cursor.
    pub async fn list_for_workspace(
        &self,
        workspace_id: &str,
        owner: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> WorkspaceResult<ConversationPage> {
        require_workspace(self.store.as_ref(), OwnerScope::new(workspace_id, owner)).await?;

        let until = cursor.map(parse_cursor).transpose()?;
        let filter = ConversationFilter {
            owner: owner.to_string(),
            workspace_id: workspace_id.to_string(),
            until,
            limit: limit + 1,
        };

        let mut conversations = self.conversations.find(&filter).await?;
        let next_cursor = if conversations.len() > limit {
            conversations
                .pop()
                .map(|next| format_cursor(&next.updated_at))
        } else {
            None
        };

        Ok(ConversationPage {
            conversations,
            next_cursor,
        })
    }
}
