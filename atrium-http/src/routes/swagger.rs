use crate::handlers::{chat, workspaces};
use crate::models::{
    ContextBreakdown, ContextResponse, ConversationsResponse, CreateWorkspaceRequest,
    ListWorkspacesResponse, ManageFilesRequest, Pagination, UpdateWorkspaceRequest,
};
use atrium_core::model::{ConversationRef, FileRecord, Workspace};
use atrium_core::services::FileAction;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        workspaces::create_workspace,
        workspaces::list_workspaces,
        workspaces::get_workspace,
        workspaces::update_workspace,
        workspaces::delete_workspace,
        workspaces::list_workspace_conversations,
        workspaces::list_workspace_files,
        workspaces::get_workspace_context,
        workspaces::manage_workspace_files,
        chat::prepare_chat
    ),
    components(schemas(
        Workspace,
        FileRecord,
        ConversationRef,
        FileAction,
        CreateWorkspaceRequest,
        UpdateWorkspaceRequest,
        ListWorkspacesResponse,
        Pagination,
        ConversationsResponse,
        ContextResponse,
        ContextBreakdown,
        ManageFilesRequest
    )),
    tags(
        (name = "workspaces", description = "Workspace management"),
        (name = "chat", description = "Chat request preparation")
    ),
    servers(
        (url = "http://localhost:3000/api/v1", description = "Local development server"),
    )
)]
pub struct ApiDoc;
