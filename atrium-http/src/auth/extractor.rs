use crate::models::user::User;
use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};

/// Extractor for the authenticated user
///
/// Reads the user that `auth_middleware` placed in the request extensions
/// without consuming the request body.
pub struct AuthUser(pub User);

impl AuthUser {
    /// Owner key used to scope workspace operations
    pub fn user_id(&self) -> &str {
        &self.0.user_id
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(StatusCode::UNAUTHORIZED)?
            .clone();

        Ok(AuthUser(user))
    }
}
