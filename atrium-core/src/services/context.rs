//! Workspace context injection for the first message of a conversation.
//!
//! Loading the context talks to the stores; applying it is the pure
//! [`augment`] transform. Injection is optional: any failure leaves the chat
//! request exactly as the caller sent it.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{StoreError, WorkspaceResult};
use crate::model::{ChatRequest, FileProjection};
use crate::store::{FileStore, OwnerScope, WorkspaceStore};

/// Instructions and files contributed by a workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceContext {
    pub instructions: Option<String>,
    pub files: Vec<Value>,
}

impl WorkspaceContext {
    pub fn is_empty(&self) -> bool {
        self.instructions.as_deref().is_none_or(str::is_empty) && self.files.is_empty()
    }
}

/// Apply a workspace context to a chat request.
///
/// Instructions go first, separated from any existing prompt prefix by a blank
/// line. Workspace files are appended after the caller's files; duplicates are
/// left for the downstream file processing to resolve.
pub fn augment(mut request: ChatRequest, context: &WorkspaceContext) -> ChatRequest {
    if let Some(instructions) = context.instructions.as_deref().filter(|i| !i.is_empty()) {
        request.prompt_prefix = Some(match request.prompt_prefix.as_deref() {
            Some(existing) if !existing.is_empty() => format!("{instructions}\n\n{existing}"),
            _ => instructions.to_string(),
        });
    }

    if !context.files.is_empty() {
        request.files.extend(context.files.iter().cloned());
    }

    request
}

#[derive(Clone)]
pub struct ContextAssembler {
    store: Arc<dyn WorkspaceStore>,
    files: Arc<dyn FileStore>,
}

impl ContextAssembler {
    pub fn new(store: Arc<dyn WorkspaceStore>, files: Arc<dyn FileStore>) -> Self {
        Self { store, files }
    }

    /// Load the context of a workspace owned by `owner`.
    ///
    /// `Ok(None)` when the workspace does not exist or belongs to someone else.
    pub async fn load(
        &self,
        workspace_id: &str,
        owner: &str,
    ) -> WorkspaceResult<Option<WorkspaceContext>> {
        let Some(workspace) = self.store.get(OwnerScope::new(workspace_id, owner)).await? else {
            return Ok(None);
        };

        let mut context = WorkspaceContext {
            instructions: workspace.instructions.clone().filter(|i| !i.is_empty()),
            files: Vec::new(),
        };

        if !workspace.files.is_empty() {
            let records = self
                .files
                .get_files(&workspace.files, FileProjection::WithoutText)
                .await?;
            if records.is_empty() {
                debug!("Couldn't find workspace files for workspace {}", workspace_id);
            }
            context.files = records
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<_, _>>()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
        }

        Ok(Some(context))
    }

    /// Produce the request to forward downstream.
    ///
    /// Only the first message of a conversation that names a workspace is
    /// touched. Errors are logged and swallowed.
    pub async fn prepare(&self, request: ChatRequest, owner: &str) -> ChatRequest {
        let Some(workspace_id) = request.injection_target().map(str::to_owned) else {
            return request;
        };

        match self.load(&workspace_id, owner).await {
            Ok(Some(context)) if !context.is_empty() => {
                debug!(
                    "Injecting workspace {} context: instructions={}, files={}",
                    workspace_id,
                    context.instructions.is_some(),
                    context.files.len()
                );
                augment(request, &context)
            }
            Ok(_) => request,
            Err(e) => {
                warn!(
                    "Failed to inject workspace context for workspace {}: {}",
                    workspace_id, e
                );
                request
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreResult;
    use crate::model::{FileId, FileRecord, NO_PARENT, NewWorkspace, Workspace, WorkspaceUpdate};
    use crate::store::{InMemoryFileStore, InMemoryWorkspaceStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct FailingFileStore;

    #[async_trait]
    impl FileStore for FailingFileStore {
        async fn get_files(
            &self,
            _ids: &[FileId],
            _projection: FileProjection,
        ) -> StoreResult<Vec<FileRecord>> {
            Err(StoreError::Unavailable("file store offline".into()))
        }
    }

    fn file(id: &str, owner: &str) -> FileRecord {
        let now = Utc::now();
        FileRecord {
            file_id: id.into(),
            user: owner.into(),
            filename: format!("{id}.txt"),
            filepath: format!("/uploads/{id}.txt"),
            mime_type: "text/plain".into(),
            bytes: 10,
            width: None,
            height: None,
            text: Some("secret text".into()),
            created_at: now,
            updated_at: now,
        }
    }

    async fn seeded_workspace(
        store: &InMemoryWorkspaceStore,
        instructions: Option<&str>,
        files: Vec<FileId>,
    ) -> Workspace {
        let ws = store
            .insert(Workspace::new(
                NewWorkspace::parse("alice", Some("ws"), None, instructions).unwrap(),
            ))
            .await
            .unwrap();
        store
            .update(OwnerScope::new(&ws.id, "alice"), WorkspaceUpdate::files(files))
            .await
            .unwrap()
            .unwrap()
    }

    fn first_message(workspace_id: &str) -> ChatRequest {
        ChatRequest {
            workspace_id: Some(workspace_id.to_string()),
            parent_message_id: Some(NO_PARENT.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_augment_places_instructions_before_existing_prefix() {
        let request = ChatRequest {
            prompt_prefix: Some("Existing".into()),
            files: vec![json!({"file_id": "caller"})],
            ..Default::default()
        };
        let context = WorkspaceContext {
            instructions: Some("Workspace rules".into()),
            files: vec![json!({"file_id": "ws-file"})],
        };

        let out = augment(request, &context);

        assert_eq!(out.prompt_prefix.as_deref(), Some("Workspace rules\n\nExisting"));
        assert_eq!(
            out.files,
            vec![json!({"file_id": "caller"}), json!({"file_id": "ws-file"})]
        );
    }

    #[test]
    fn test_augment_without_existing_prefix_uses_instructions_alone() {
        let context = WorkspaceContext {
            instructions: Some("Rules".into()),
            files: vec![],
        };
        let out = augment(ChatRequest::default(), &context);
        assert_eq!(out.prompt_prefix.as_deref(), Some("Rules"));
        assert!(out.files.is_empty());
    }

    #[test]
    fn test_augment_with_empty_context_is_identity() {
        let request = ChatRequest {
            prompt_prefix: Some("Keep".into()),
            ..Default::default()
        };
        let out = augment(request.clone(), &WorkspaceContext::default());
        assert_eq!(out, request);
    }

    #[tokio::test]
    async fn test_prepare_injects_on_first_message() {
        let store = InMemoryWorkspaceStore::new();
        let files = InMemoryFileStore::with_files([file("f1", "alice")]);
        let ws = seeded_workspace(&store, Some("Be formal"), vec!["f1".into()]).await;
        let assembler = ContextAssembler::new(Arc::new(store), Arc::new(files));

        let out = assembler.prepare(first_message(&ws.id), "alice").await;

        assert_eq!(out.prompt_prefix.as_deref(), Some("Be formal"));
        assert_eq!(out.files.len(), 1);
        assert_eq!(out.files[0]["file_id"], "f1");
        assert!(out.files[0].get("text").is_none());
    }

    #[tokio::test]
    async fn test_prepare_skips_follow_ups_and_foreign_workspaces() {
        let store = InMemoryWorkspaceStore::new();
        let ws = seeded_workspace(&store, Some("Be formal"), vec![]).await;
        let assembler =
            ContextAssembler::new(Arc::new(store), Arc::new(InMemoryFileStore::new()));

        let mut follow_up = first_message(&ws.id);
        follow_up.parent_message_id = Some("msg-1".into());
        assert_eq!(assembler.prepare(follow_up.clone(), "alice").await, follow_up);

        let foreign = first_message(&ws.id);
        assert_eq!(assembler.prepare(foreign.clone(), "bob").await, foreign);

        let missing = first_message("nope");
        assert_eq!(assembler.prepare(missing.clone(), "alice").await, missing);
    }

    #[tokio::test]
    async fn test_prepare_swallows_file_store_errors() {
        let store = InMemoryWorkspaceStore::new();
        let ws = seeded_workspace(&store, Some("Be formal"), vec!["f1".into()]).await;
        let assembler = ContextAssembler::new(Arc::new(store), Arc::new(FailingFileStore));

        let request = first_message(&ws.id);
        let out = assembler.prepare(request.clone(), "alice").await;

        assert_eq!(out, request);
    }
}
