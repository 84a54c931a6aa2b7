use crate::handlers::{
    create_workspace, delete_workspace, get_workspace, get_workspace_context,
    list_workspace_conversations, list_workspace_files, list_workspaces, manage_workspace_files,
    update_workspace,
};
use crate::server::AppState;
use axum::{Router, routing::get};

/// Create the workspace routes with state
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", get(list_workspaces).post(create_workspace))
        .route(
            "/workspaces/{id}",
            get(get_workspace)
                .patch(update_workspace)
                .delete(delete_workspace),
        )
        .route(
            "/workspaces/{id}/conversations",
            get(list_workspace_conversations),
        )
        .route(
            "/workspaces/{id}/files",
            get(list_workspace_files).patch(manage_workspace_files),
        )
        .route("/workspaces/{id}/context", get(get_workspace_context))
}
