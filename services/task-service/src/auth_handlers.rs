use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use common_auth::AuthError;
use serde::{Deserialize, Serialize};

use crate::auth_service::TokenPair;
use crate::errors::{ApiError, ApiResult};
use crate::extractors::parse_bearer;
use crate::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "bearer",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

const MIN_PASSWORD_CHARS: usize = 8;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    if !request.email.contains('@') {
        state.metrics.registration("rejected");
        return Err(ApiError::bad_request("invalid_email"));
    }
    if request.password.chars().count() < MIN_PASSWORD_CHARS {
        state.metrics.registration("rejected");
        return Err(ApiError::bad_request("weak_password"));
    }

    match state
        .auth
        .register(&request.email, &request.password, &request.full_name)
        .await
    {
        Ok(_) => {
            state.metrics.registration("success");
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse {
                    message: "User registered successfully",
                }),
            ))
        }
        Err(err) => {
            state.metrics.registration(auth_outcome(&err));
            Err(err.into())
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    match state.auth.login(&request.email, &request.password).await {
        Ok(pair) => {
            state.metrics.login_attempt("success");
            Ok(Json(pair.into()))
        }
        Err(err) => {
            state.metrics.login_attempt(auth_outcome(&err));
            Err(err.into())
        }
    }
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<Json<TokenResponse>> {
    match state.auth.refresh(&request.refresh_token).await {
        Ok(pair) => {
            state.metrics.token_refresh("success");
            Ok(Json(pair.into()))
        }
        Err(err) => {
            state.metrics.token_refresh(auth_outcome(&err));
            Err(err.into())
        }
    }
}

/// Ends a session. The header must be bearer-shaped but the tokens
/// themselves are revoked sight unseen, so logging out twice or with a
/// stale pair still returns 200.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LogoutRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let header_value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::Unauthorized)?;
    let access_token = parse_bearer(header_value)?;

    state.auth.logout(&access_token, &request.refresh_token).await;
    state.metrics.logout();

    Ok(Json(MessageResponse {
        message: "Successfully logged out",
    }))
}

fn auth_outcome(err: &AuthError) -> &'static str {
    match err {
        AuthError::Internal(_) => "error",
        _ => "rejected",
    }
}
