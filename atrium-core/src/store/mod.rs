//! Persistence seams for workspaces and the collaborators they read from.
//!
//! The workspace store is owned by this crate. Files and conversations belong
//! to other parts of the application and are only read here.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{
    ConversationFilter, ConversationRef, FileId, FileProjection, FileRecord, Workspace,
    WorkspaceUpdate,
};

pub use memory::{InMemoryConversationStore, InMemoryFileStore, InMemoryWorkspaceStore};

/// Ownership filter applied by every workspace lookup.
///
/// A record that fails the scope is treated exactly like a missing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerScope<'a> {
    pub workspace_id: &'a str,
    pub owner: &'a str,
}

impl<'a> OwnerScope<'a> {
    pub fn new(workspace_id: &'a str, owner: &'a str) -> Self {
        Self {
            workspace_id,
            owner,
        }
    }

    pub fn admits(&self, workspace: &Workspace) -> bool {
        workspace.id == self.workspace_id && workspace.owner == self.owner
    }
}

/// One page of an owner's workspaces plus the owner's total count.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspacePage {
    pub workspaces: Vec<Workspace>,
    pub total: usize,
}

/// CRUD persistence for workspace records.
///
/// `update` and `delete` must act on a single record atomically: the scope
/// check and the write happen together.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn insert(&self, workspace: Workspace) -> StoreResult<Workspace>;

    /// Owner's workspaces sorted by `updated_at` descending.
    async fn list(&self, owner: &str, limit: usize, skip: usize) -> StoreResult<WorkspacePage>;

    async fn get(&self, scope: OwnerScope<'_>) -> StoreResult<Option<Workspace>>;

    async fn update(
        &self,
        scope: OwnerScope<'_>,
        update: WorkspaceUpdate,
    ) -> StoreResult<Option<Workspace>>;

    async fn delete(&self, scope: OwnerScope<'_>) -> StoreResult<Option<Workspace>>;
}

/// Read access to uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Files whose id is in `ids`, in no particular order. Unknown ids are skipped.
    async fn get_files(
        &self,
        ids: &[FileId],
        projection: FileProjection,
    ) -> StoreResult<Vec<FileRecord>>;
}

/// Read access to conversations.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Matching conversations sorted by `updated_at` descending, at most `filter.limit`.
    async fn find(&self, filter: &ConversationFilter) -> StoreResult<Vec<ConversationRef>>;
}

