use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::extractors::CurrentUser;
use crate::users::{self, User};
use crate::AppState;

/// Public view of an account. The password hash never leaves the store.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<UserProfile>> {
    let user = users::find_by_id(&state.db, current_user.user_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("user_not_found"))?;

    Ok(Json(user.into()))
}
