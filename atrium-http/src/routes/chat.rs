use crate::context::inject_workspace_context;
use crate::handlers::prepare_chat;
use crate::server::AppState;
use axum::{Router, middleware, routing::post};

/// Chat routes; every body passes through workspace context injection first
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/chat/prepare", post(prepare_chat))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            inject_workspace_context,
        ))
}
