use crate::auth::AuthStore;
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Header carrying the caller's API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Axum middleware for API key authentication
pub async fn auth_middleware(
    State(auth_store): State<Arc<AuthStore>>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = request.uri().path();
    if ignore_auth_path(path) {
        trace!("auth skipped for {}", path);
        return Ok(next.run(request).await);
    }

    let Some(api_key) = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        debug!("missing API key for {}", path);
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = auth_store.get_user_by_api_key(api_key).ok_or_else(|| {
        debug!("unknown API key for {}", path);
        StatusCode::UNAUTHORIZED
    })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn ignore_auth_path(path: &str) -> bool {
    is_health_path(path) || is_swagger_path(path) || is_api_docs_path(path)
}

pub fn is_health_path(path: &str) -> bool {
    path.starts_with("/health")
}

pub fn is_swagger_path(path: &str) -> bool {
    path.starts_with("/swagger-ui")
}

pub fn is_api_docs_path(path: &str) -> bool {
    path.starts_with("/api-docs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(ignore_auth_path("/health"));
        assert!(ignore_auth_path("/swagger-ui/index.html"));
        assert!(ignore_auth_path("/api-docs/openapi.json"));
        assert!(!ignore_auth_path("/api/v1/workspaces"));
        assert!(!ignore_auth_path("/api/v1/chat/prepare"));
    }
}
