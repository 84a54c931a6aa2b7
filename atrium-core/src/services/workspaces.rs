//! Validated CRUD over the workspace store.

use std::sync::Arc;

use tracing::debug;

use super::require_workspace;
use crate::config::WorkspaceConfig;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::model::{FileProjection, FileRecord, NewWorkspace, Workspace, WorkspaceUpdate};
use crate::store::{FileStore, OwnerScope, WorkspaceStore};

/// One page of workspaces with offset pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceListing {
    pub workspaces: Vec<Workspace>,
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

#[derive(Clone)]
pub struct WorkspaceService {
    store: Arc<dyn WorkspaceStore>,
    files: Arc<dyn FileStore>,
    config: WorkspaceConfig,
}

impl WorkspaceService {
    pub fn new(
        store: Arc<dyn WorkspaceStore>,
        files: Arc<dyn FileStore>,
        config: WorkspaceConfig,
    ) -> Self {
        Self {
            store,
            files,
            config,
        }
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub async fn create(
        &self,
        owner: &str,
        name: Option<&str>,
        description: Option<&str>,
        instructions: Option<&str>,
    ) -> WorkspaceResult<Workspace> {
        let new = NewWorkspace::parse(owner, name, description, instructions)?;
        let workspace = self.store.insert(Workspace::new(new)).await?;
        debug!("Created workspace {} for user {}", workspace.id, owner);
        Ok(workspace)
    }

    /// List the owner's workspaces, most recently updated first.
    ///
    /// `page` is 1-based; missing or zero values fall back to the first page
    /// and the configured default limit.
    pub async fn list(
        &self,
        owner: &str,
        page: Option<usize>,
        limit: Option<usize>,
    ) -> WorkspaceResult<WorkspaceListing> {
        let limit = self.config.list_limit(limit);
        let page = page.unwrap_or(1).max(1);
        let skip = (page - 1).saturating_mul(limit);

        let result = self.store.list(owner, limit, skip).await?;
        let pages = if limit == 0 {
            0
        } else {
            result.total.div_ceil(limit)
        };

        Ok(WorkspaceListing {
            workspaces: result.workspaces,
            page,
            limit,
            total: result.total,
            pages,
        })
    }

    pub async fn get(&self, workspace_id: &str, owner: &str) -> WorkspaceResult<Workspace> {
        require_workspace(self.store.as_ref(), OwnerScope::new(workspace_id, owner)).await
    }

    pub async fn update(
        &self,
        workspace_id: &str,
        owner: &str,
        name: Option<&str>,
        description: Option<&str>,
        instructions: Option<&str>,
    ) -> WorkspaceResult<Workspace> {
        let update = WorkspaceUpdate::fields(name, description, instructions)?;
        self.store
            .update(OwnerScope::new(workspace_id, owner), update)
            .await?
            .ok_or_else(WorkspaceError::workspace_not_found)
    }

    /// Hard-delete a workspace. Conversations and files are left untouched.
    pub async fn delete(&self, workspace_id: &str, owner: &str) -> WorkspaceResult<Workspace> {
        let deleted = self
            .store
            .delete(OwnerScope::new(workspace_id, owner))
            .await?
            .ok_or_else(WorkspaceError::workspace_not_found)?;
        debug!("Deleted workspace {} for user {}", workspace_id, owner);
        Ok(deleted)
    }

    /// Files referenced by the workspace, without extracted text.
    pub async fn list_files(
        &self,
        workspace_id: &str,
        owner: &str,
    ) -> WorkspaceResult<Vec<FileRecord>> {
        let workspace = self.get(workspace_id, owner).await?;
        if workspace.files.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .files
            .get_files(&workspace.files, FileProjection::WithoutText)
            .await?)
    }
}
