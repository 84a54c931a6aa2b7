use crate::auth::AuthUser;
use crate::error::AppError;
use crate::models::{
    ContextResponse, ConversationsQuery, ConversationsResponse, CreateWorkspaceRequest,
    ListWorkspacesQuery, ListWorkspacesResponse, ManageFilesRequest, UpdateWorkspaceRequest,
};
use crate::server::AppState;
use atrium_core::model::{FileRecord, Workspace};
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};

/// Create a workspace
///
/// Creates a workspace owned by the caller.
#[utoipa::path(
    post,
    path = "/workspaces",
    request_body = CreateWorkspaceRequest,
    responses(
        (status = 201, description = "Workspace created", body = Workspace),
        (status = 400, description = "Name missing or blank"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn create_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateWorkspaceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Workspace>), AppError> {
    let Json(request) = payload?;
    let workspace = state
        .workspaces
        .create(
            auth.user_id(),
            request.name.as_deref(),
            request.description.as_deref(),
            request.instructions.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(workspace)))
}

/// List workspaces
///
/// Returns the caller's workspaces, most recently updated first.
#[utoipa::path(
    get,
    path = "/workspaces",
    params(ListWorkspacesQuery),
    responses(
        (status = 200, description = "Workspaces listed", body = ListWorkspacesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn list_workspaces(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListWorkspacesQuery>,
) -> Result<Json<ListWorkspacesResponse>, AppError> {
    let listing = state
        .workspaces
        .list(auth.user_id(), query.page(), query.limit())
        .await?;

    Ok(Json(listing.into()))
}

/// Get workspace
#[utoipa::path(
    get,
    path = "/workspaces/{id}",
    responses(
        (status = 200, description = "Workspace retrieved", body = Workspace),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "Workspace identifier")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn get_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Workspace>, AppError> {
    let workspace = state.workspaces.get(&id, auth.user_id()).await?;
    Ok(Json(workspace))
}

/// Update workspace
///
/// Only `name`, `description` and `instructions` are editable.
#[utoipa::path(
    patch,
    path = "/workspaces/{id}",
    request_body = UpdateWorkspaceRequest,
    responses(
        (status = 200, description = "Workspace updated", body = Workspace),
        (status = 400, description = "No valid fields or blank name"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "Workspace identifier")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn update_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateWorkspaceRequest>, JsonRejection>,
) -> Result<Json<Workspace>, AppError> {
    let Json(request) = payload?;
    let workspace = state
        .workspaces
        .update(
            &id,
            auth.user_id(),
            request.name(),
            request.description(),
            request.instructions(),
        )
        .await?;

    Ok(Json(workspace))
}

/// Delete workspace
///
/// Returns the deleted record. Linked conversations and files are kept.
#[utoipa::path(
    delete,
    path = "/workspaces/{id}",
    responses(
        (status = 200, description = "Workspace deleted", body = Workspace),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "Workspace identifier")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn delete_workspace(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Workspace>, AppError> {
    let workspace = state.workspaces.delete(&id, auth.user_id()).await?;
    Ok(Json(workspace))
}

/// List workspace conversations
///
/// Cursor-paginated, most recently updated first.
#[utoipa::path(
    get,
    path = "/workspaces/{id}/conversations",
    params(
        ("id" = String, Path, description = "Workspace identifier"),
        ConversationsQuery
    ),
    responses(
        (status = 200, description = "Conversations listed", body = ConversationsResponse),
        (status = 400, description = "Invalid cursor"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn list_workspace_conversations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Query(query): Query<ConversationsQuery>,
) -> Result<Json<ConversationsResponse>, AppError> {
    let limit = state.workspaces.config().conversation_limit(query.limit());
    let page = state
        .conversations
        .list_for_workspace(&id, auth.user_id(), limit, query.cursor())
        .await?;

    Ok(Json(page.into()))
}

/// List workspace files
///
/// File records without extracted text.
#[utoipa::path(
    get,
    path = "/workspaces/{id}/files",
    responses(
        (status = 200, description = "Files listed", body = Vec<FileRecord>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "Workspace identifier")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn list_workspace_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<FileRecord>>, AppError> {
    let files = state.workspaces.list_files(&id, auth.user_id()).await?;
    Ok(Json(files))
}

/// Workspace context size
///
/// Token estimate for the workspace's instructions and files.
#[utoipa::path(
    get,
    path = "/workspaces/{id}/context",
    responses(
        (status = 200, description = "Context estimated", body = ContextResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Workspace not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "Workspace identifier")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn get_workspace_context(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ContextResponse>, AppError> {
    let usage = state.tokens.context_for(&id, auth.user_id()).await?;
    Ok(Json(usage.into()))
}

/// Manage workspace files
///
/// Adds or removes file references. Added files must exist and belong to the caller.
#[utoipa::path(
    patch,
    path = "/workspaces/{id}/files",
    request_body = ManageFilesRequest,
    responses(
        (status = 200, description = "Files updated", body = Workspace),
        (status = 400, description = "Invalid action or file_ids"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "File owned by another user"),
        (status = 404, description = "Workspace or file not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("id" = String, Path, description = "Workspace identifier")
    ),
    tag = "workspaces"
)]
#[axum::debug_handler]
pub async fn manage_workspace_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ManageFilesRequest>, JsonRejection>,
) -> Result<Json<Workspace>, AppError> {
    let Json(request) = payload?;
    let (action, file_ids) = request.parse()?;
    let workspace = state
        .membership
        .manage_files(&id, auth.user_id(), action, &file_ids)
        .await?;

    Ok(Json(workspace))
}
