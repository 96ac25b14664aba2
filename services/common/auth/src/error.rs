use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already exists")]
    DuplicateEmail,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Invalid token subject")]
    InvalidIdentity,
    #[error("User not found")]
    UserNotFound,
    #[error("Not authenticated")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Self::InvalidToken
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::DuplicateEmail => (StatusCode::BAD_REQUEST, "duplicate_email"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AuthError::InvalidToken | AuthError::InvalidIdentity | AuthError::UserNotFound => {
                (StatusCode::UNAUTHORIZED, "invalid_token")
            }
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            AuthError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        // A refresh token for a deleted account must not be distinguishable
        // from any other bad token.
        let message = match &self {
            AuthError::UserNotFound => AuthError::InvalidToken.to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody { code, message };
        let mut response = (status, Json(body)).into_response();
        if let Ok(value) = HeaderValue::from_str(code) {
            response.headers_mut().insert("X-Error-Code", value);
        }
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
