use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common_auth::AuthError;
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: &'static str, message: Option<String> },
    Unauthorized { code: &'static str, message: String },
    NotFound { code: &'static str },
    Internal { message: Option<String> },
}

impl ApiError {
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal { message: Some(e.to_string()) }
    }
    pub fn bad_request(code: &'static str) -> Self {
        Self::BadRequest { code, message: None }
    }
    pub fn not_found(code: &'static str) -> Self {
        Self::NotFound { code }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        // A refresh token for a deleted account must not be distinguishable
        // from any other bad token.
        let message = match &err {
            AuthError::UserNotFound => AuthError::InvalidToken.to_string(),
            other => other.to_string(),
        };
        match err {
            AuthError::DuplicateEmail => ApiError::BadRequest {
                code: "duplicate_email",
                message: Some(message),
            },
            AuthError::InvalidCredentials => ApiError::Unauthorized {
                code: "invalid_credentials",
                message,
            },
            AuthError::InvalidToken | AuthError::InvalidIdentity | AuthError::UserNotFound => {
                ApiError::Unauthorized { code: "invalid_token", message }
            }
            AuthError::Unauthorized => ApiError::Unauthorized {
                code: "unauthorized",
                message,
            },
            AuthError::Internal(_) => ApiError::Internal { message: Some(message) },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body, error_code) = match self {
            ApiError::BadRequest { code, message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody { code: code.into(), message },
                code,
            ),
            ApiError::Unauthorized { code, message } => (
                StatusCode::UNAUTHORIZED,
                ErrorBody { code: code.into(), message: Some(message) },
                code,
            ),
            ApiError::NotFound { code } => (
                StatusCode::NOT_FOUND,
                ErrorBody { code: code.into(), message: None },
                code,
            ),
            ApiError::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { code: "internal_error".into(), message },
                "internal_error",
            ),
        };
        let unauthorized = status == StatusCode::UNAUTHORIZED;
        let mut resp = (status, Json(body)).into_response();
        if let Ok(val) = HeaderValue::from_str(error_code) {
            resp.headers_mut().insert("X-Error-Code", val);
        }
        if unauthorized {
            resp.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
