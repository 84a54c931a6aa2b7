//! In-memory backends.
//!
//! Records live in `DashMap`s so a single record's read-modify-write happens
//! under one entry lock. Data is lost when the process exits.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

use super::{ConversationStore, FileStore, OwnerScope, WorkspacePage, WorkspaceStore};
use crate::error::StoreResult;
use crate::model::{
    ConversationFilter, ConversationId, ConversationRef, FileId, FileProjection, FileRecord,
    Workspace, WorkspaceId, WorkspaceUpdate,
};

/// Workspace records keyed by id.
#[derive(Clone, Debug, Default)]
pub struct InMemoryWorkspaceStore {
    workspaces: Arc<DashMap<WorkspaceId, Workspace>>,
}

impl InMemoryWorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }
}

#[async_trait]
impl WorkspaceStore for InMemoryWorkspaceStore {
    async fn insert(&self, workspace: Workspace) -> StoreResult<Workspace> {
        self.workspaces.insert(workspace.id.clone(), workspace.clone());
        Ok(workspace)
    }

    async fn list(&self, owner: &str, limit: usize, skip: usize) -> StoreResult<WorkspacePage> {
        let mut owned: Vec<Workspace> = self
            .workspaces
            .iter()
            .filter(|entry| entry.value().owner == owner)
            .map(|entry| entry.value().clone())
            .collect();

        owned.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = owned.len();
        let workspaces = owned.into_iter().skip(skip).take(limit).collect();
        Ok(WorkspacePage { workspaces, total })
    }

    async fn get(&self, scope: OwnerScope<'_>) -> StoreResult<Option<Workspace>> {
        Ok(self
            .workspaces
            .get(scope.workspace_id)
            .filter(|entry| scope.admits(entry.value()))
            .map(|entry| entry.value().clone()))
    }

    async fn update(
        &self,
        scope: OwnerScope<'_>,
        update: WorkspaceUpdate,
    ) -> StoreResult<Option<Workspace>> {
        match self.workspaces.get_mut(scope.workspace_id) {
            Some(mut entry) if scope.admits(entry.value()) => {
                entry.value_mut().apply(update);
                Ok(Some(entry.value().clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, scope: OwnerScope<'_>) -> StoreResult<Option<Workspace>> {
        Ok(self
            .workspaces
            .remove_if(scope.workspace_id, |_, workspace| scope.admits(workspace))
            .map(|(_, workspace)| workspace))
    }
}

/// File records keyed by `file_id`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryFileStore {
    files: Arc<DashMap<FileId, FileRecord>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(files: impl IntoIterator<Item = FileRecord>) -> Self {
        let store = Self::new();
        for file in files {
            store.insert(file);
        }
        store
    }

    pub fn insert(&self, file: FileRecord) {
        self.files.insert(file.file_id.clone(), file);
    }

    pub fn remove(&self, file_id: &str) {
        self.files.remove(file_id);
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn get_files(
        &self,
        ids: &[FileId],
        projection: FileProjection,
    ) -> StoreResult<Vec<FileRecord>> {
        let mut seen = HashSet::new();
        let files = ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter_map(|id| self.files.get(id).map(|entry| entry.value().clone()))
            .map(|file| match projection {
                FileProjection::WithText => file,
                FileProjection::WithoutText => file.without_text(),
            })
            .collect();
        Ok(files)
    }
}

/// Conversation references keyed by `conversation_id`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<DashMap<ConversationId, ConversationRef>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_conversations(conversations: impl IntoIterator<Item = ConversationRef>) -> Self {
        let store = Self::new();
        for conversation in conversations {
            store.insert(conversation);
        }
        store
    }

    pub fn insert(&self, conversation: ConversationRef) {
        self.conversations
            .insert(conversation.conversation_id.clone(), conversation);
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find(&self, filter: &ConversationFilter) -> StoreResult<Vec<ConversationRef>> {
        let mut matching: Vec<ConversationRef> = self
            .conversations
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.conversation_id.cmp(&b.conversation_id))
        });
        matching.truncate(filter.limit);
        Ok(matching)
    }
}
