//! Adding and removing file references on a workspace.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::require_workspace;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::model::{FileId, FileProjection, Workspace, WorkspaceUpdate};
use crate::store::{FileStore, OwnerScope, WorkspaceStore};

/// Membership change requested for a set of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Add,
    Remove,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileAction::Add => write!(f, "add"),
            FileAction::Remove => write!(f, "remove"),
        }
    }
}

impl FromStr for FileAction {
    type Err = WorkspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(FileAction::Add),
            "remove" => Ok(FileAction::Remove),
            _ => Err(WorkspaceError::validation(
                "action",
                r#"Invalid action. Must be "add" or "remove""#,
            )),
        }
    }
}

/// Existing ids followed by requested ids not yet present, in input order.
pub fn merge_files(existing: &[FileId], requested: &[FileId]) -> Vec<FileId> {
    let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut merged = existing.to_vec();
    for id in requested {
        if seen.insert(id.as_str()) {
            merged.push(id.clone());
        }
    }
    merged
}

/// Existing ids minus every requested id. Absent ids are ignored.
pub fn remove_files(existing: &[FileId], requested: &[FileId]) -> Vec<FileId> {
    let removed: HashSet<&str> = requested.iter().map(String::as_str).collect();
    existing
        .iter()
        .filter(|id| !removed.contains(id.as_str()))
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct FileMembership {
    store: Arc<dyn WorkspaceStore>,
    files: Arc<dyn FileStore>,
}

impl FileMembership {
    pub fn new(store: Arc<dyn WorkspaceStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Add or remove file references and return the updated workspace.
    ///
    /// Adding is all-or-nothing: every file must exist and belong to `owner`.
    pub async fn manage_files(
        &self,
        workspace_id: &str,
        owner: &str,
        action: FileAction,
        file_ids: &[FileId],
    ) -> WorkspaceResult<Workspace> {
        if file_ids.is_empty() {
            return Err(WorkspaceError::validation(
                "file_ids",
                "file_ids must be a non-empty array",
            ));
        }

        let scope = OwnerScope::new(workspace_id, owner);
        let workspace = require_workspace(self.store.as_ref(), scope).await?;

        let files = match action {
            FileAction::Add => {
                self.check_ownership(owner, file_ids).await?;
                merge_files(&workspace.files, file_ids)
            }
            FileAction::Remove => remove_files(&workspace.files, file_ids),
        };

        let updated = self
            .store
            .update(scope, WorkspaceUpdate::files(files))
            .await?
            .ok_or_else(WorkspaceError::workspace_not_found)?;

        debug!(
            "Workspace {}: {} {} file(s), now {}",
            workspace_id,
            action,
            file_ids.len(),
            updated.files.len()
        );
        Ok(updated)
    }

    async fn check_ownership(&self, owner: &str, file_ids: &[FileId]) -> WorkspaceResult<()> {
        let files = self
            .files
            .get_files(file_ids, FileProjection::WithoutText)
            .await?;

        if files.len() != file_ids.len() {
            return Err(WorkspaceError::files_not_found());
        }
        if files.iter().any(|file| file.user != owner) {
            return Err(WorkspaceError::Forbidden(
                "You can only add files you own to the workspace".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FileRecord, NewWorkspace};
    use crate::store::{InMemoryFileStore, InMemoryWorkspaceStore};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn ids(raw: &[&str]) -> Vec<FileId> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn file(id: &str, owner: &str) -> FileRecord {
        let now = Utc::now();
        FileRecord {
            file_id: id.into(),
            user: owner.into(),
            filename: id.into(),
            filepath: String::new(),
            mime_type: "text/plain".into(),
            bytes: 1,
            width: None,
            height: None,
            text: None,
            created_at: now,
            updated_at: now,
        }
    }

    async fn setup(existing: &[&str]) -> (FileMembership, InMemoryWorkspaceStore, Workspace) {
        let store = InMemoryWorkspaceStore::new();
        let files = InMemoryFileStore::with_files([
            file("A", "alice"),
            file("B", "alice"),
            file("C", "alice"),
            file("X", "bob"),
        ]);
        let ws = store
            .insert(Workspace::new(
                NewWorkspace::parse("alice", Some("ws"), None, None).unwrap(),
            ))
            .await
            .unwrap();
        let ws = store
            .update(
                OwnerScope::new(&ws.id, "alice"),
                WorkspaceUpdate::files(ids(existing)),
            )
            .await
            .unwrap()
            .unwrap();
        let membership = FileMembership::new(Arc::new(store.clone()), Arc::new(files));
        (membership, store, ws)
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("add".parse::<FileAction>().unwrap(), FileAction::Add);
        assert_eq!("remove".parse::<FileAction>().unwrap(), FileAction::Remove);
        assert!(matches!(
            "delete".parse::<FileAction>(),
            Err(WorkspaceError::Validation { field: "action", .. })
        ));
        assert!("Add".parse::<FileAction>().is_err());
    }

    #[tokio::test]
    async fn test_add_appends_only_new_files() {
        let (membership, _, ws) = setup(&["A"]).await;

        let updated = membership
            .manage_files(&ws.id, "alice", FileAction::Add, &ids(&["A", "B"]))
            .await
            .unwrap();

        assert_eq!(updated.files, ids(&["A", "B"]));
    }

    #[tokio::test]
    async fn test_add_is_all_or_nothing_on_foreign_file() {
        let (membership, store, ws) = setup(&["A"]).await;

        let err = membership
            .manage_files(&ws.id, "alice", FileAction::Add, &ids(&["B", "X"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Forbidden(_)));

        let unchanged = store
            .get(OwnerScope::new(&ws.id, "alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.files, ids(&["A"]));
    }

    #[tokio::test]
    async fn test_add_missing_file_is_not_found() {
        let (membership, _, ws) = setup(&[]).await;

        let err = membership
            .manage_files(&ws.id, "alice", FileAction::Add, &ids(&["B", "ghost"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound(msg) if msg.contains("files")));
    }

    #[tokio::test]
    async fn test_add_with_repeated_ids_is_not_found() {
        let (membership, store, ws) = setup(&[]).await;

        let err = membership
            .manage_files(&ws.id, "alice", FileAction::Add, &ids(&["A", "A"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound(msg) if msg.contains("files")));

        let unchanged = store
            .get(OwnerScope::new(&ws.id, "alice"))
            .await
            .unwrap()
            .unwrap();
        assert!(unchanged.files.is_empty());
    }

    #[tokio::test]
    async fn test_remove_ignores_absent_ids() {
        let (membership, _, ws) = setup(&["A", "B", "C"]).await;

        let updated = membership
            .manage_files(&ws.id, "alice", FileAction::Remove, &ids(&["B", "zzz"]))
            .await
            .unwrap();
        assert_eq!(updated.files, ids(&["A", "C"]));
    }

    #[tokio::test]
    async fn test_rejects_empty_ids_and_foreign_workspace() {
        let (membership, _, ws) = setup(&[]).await;

        let err = membership
            .manage_files(&ws.id, "alice", FileAction::Add, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::Validation { field: "file_ids", .. }));

        let err = membership
            .manage_files(&ws.id, "bob", FileAction::Add, &ids(&["X"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::NotFound(_)));
    }

    proptest! {
        #[test]
        fn prop_merge_has_no_duplicates_and_keeps_prefix(
            existing in proptest::collection::hash_set("[a-e]", 0..5),
            requested in proptest::collection::vec("[a-h]", 0..8),
        ) {
            let existing: Vec<FileId> = existing.into_iter().collect();
            let merged = merge_files(&existing, &requested);

            let unique: HashSet<&String> = merged.iter().collect();
            prop_assert_eq!(unique.len(), merged.len());
            prop_assert_eq!(&merged[..existing.len()], &existing[..]);
            prop_assert!(requested.iter().all(|id| merged.contains(id)));
        }
    }
}
