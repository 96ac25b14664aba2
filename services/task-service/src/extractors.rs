use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header::AUTHORIZATION, request::Parts};
use common_auth::{AuthError, AuthResult};
use uuid::Uuid;

use crate::auth_service::AuthService;

/// The authenticated account behind a request, resolved from the bearer
/// token before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthService::from_ref(state);

        let header_value = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::Unauthorized)?;

        let token = parse_bearer(header_value)?;
        let user_id = auth.resolve_identity(&token).await?;

        Ok(Self { user_id })
    }
}

pub fn parse_bearer(value: &axum::http::HeaderValue) -> AuthResult<String> {
    let raw = value
        .to_str()
        .map_err(|_| AuthError::Unauthorized)?
        .trim();

    let token = raw
        .strip_prefix("Bearer ")
        .ok_or(AuthError::Unauthorized)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::Unauthorized);
    }

    Ok(token.to_owned())
}
