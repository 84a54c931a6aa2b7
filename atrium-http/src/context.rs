//! Workspace context injection ahead of the chat pipeline.
//!
//! The middleware buffers the chat body, lets [`ContextAssembler::prepare`]
//! inject workspace instructions and files into the first message of a
//! conversation, and forwards the result. Bodies that do not parse as a chat
//! request, or do not qualify for injection, are forwarded byte for byte.
//!
//! [`ContextAssembler::prepare`]: atrium_core::services::ContextAssembler::prepare

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::server::AppState;
use atrium_core::model::ChatRequest;
use axum::{
    body::{Body, Bytes, HttpBody, to_bytes},
    extract::{Request, State},
    http::{HeaderValue, header::CONTENT_LENGTH},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

pub async fn inject_workspace_context(
    State(state): State<AppState>,
    auth: AuthUser,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limit = state.chat_body_limit;
    let too_large = || AppError::PayloadTooLarge(format!("Request body exceeds {limit} bytes"));

    let (mut parts, body) = request.into_parts();
    if body.size_hint().lower() > limit as u64 {
        return Err(too_large());
    }
    // Past the size hint, reading only fails on the limit or a dropped connection
    let bytes = to_bytes(body, limit).await.map_err(|e| {
        debug!("Failed to buffer chat body: {}", e);
        too_large()
    })?;

    let bytes = match prepared_body(&state, auth.user_id(), &bytes).await {
        Some(prepared) => {
            parts
                .headers
                .insert(CONTENT_LENGTH, HeaderValue::from(prepared.len()));
            prepared
        }
        None => bytes,
    };

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Re-encoded body when injection applies, `None` to forward the original bytes
async fn prepared_body(state: &AppState, owner: &str, bytes: &Bytes) -> Option<Bytes> {
    let request: ChatRequest = serde_json::from_slice(bytes).ok()?;
    request.injection_target()?;

    let prepared = state.context.prepare(request.clone(), owner).await;
    if prepared == request {
        debug!("No workspace context injected");
        return None;
    }

    match serde_json::to_vec(&prepared) {
        Ok(encoded) => Some(Bytes::from(encoded)),
        Err(e) => {
            warn!("Failed to encode prepared chat request: {}", e);
            None
        }
    }
}
