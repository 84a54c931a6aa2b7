pub mod context;
pub mod conversations;
pub mod files;
pub mod tokens;
pub mod workspaces;

pub use context::{ContextAssembler, WorkspaceContext, augment};
pub use conversations::{ConversationPage, ConversationQuery};
pub use files::{FileAction, FileMembership};
pub use tokens::{ContextUsage, HeuristicTokenCounter, TokenAccountant, TokenCounter};
pub use workspaces::{WorkspaceListing, WorkspaceService};

use crate::error::{WorkspaceError, WorkspaceResult};
use crate::model::Workspace;
use crate::store::{OwnerScope, WorkspaceStore};

/// Fetch a workspace through the owner scope, mapping absence to `NotFound`.
pub(crate) async fn require_workspace(
    store: &dyn WorkspaceStore,
    scope: OwnerScope<'_>,
) -> WorkspaceResult<Workspace> {
    store
        .get(scope)
        .await?
        .ok_or_else(WorkspaceError::workspace_not_found)
}
