use crate::auth::AuthUser;
use crate::error::AppError;
use atrium_core::model::ChatRequest;
use axum::{extract::rejection::JsonRejection, response::Json};
use tracing::debug;

/// Prepare a chat request
///
/// Returns the request as it would be forwarded to the completion pipeline,
/// after workspace context has been injected into the first message of a
/// conversation.
#[utoipa::path(
    post,
    path = "/chat/prepare",
    request_body(content = serde_json::Value, description = "Chat request"),
    responses(
        (status = 200, description = "Request after context injection", body = serde_json::Value),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "chat"
)]
pub async fn prepare_chat(
    auth: AuthUser,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatRequest>, AppError> {
    let Json(request) = payload?;
    debug!(
        "Prepared chat request for user {} (workspace: {:?})",
        auth.user_id(),
        request.workspace_id
    );
    Ok(Json(request))
}
