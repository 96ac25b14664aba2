use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::errors::{ApiError, ApiResult};
use crate::extractors::CurrentUser;
use crate::tasks::{self, Page, Task, TaskStats};
use crate::AppState;

const MAX_TITLE_CHARS: usize = 255;

#[derive(Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub body: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
}

/// The nullable fields are double-wrapped so `"body": null` (clear the
/// column) stays distinguishable from leaving `body` out (keep it).
#[derive(Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub body: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_at: Option<Option<DateTime<Utc>>>,
    pub is_done: Option<bool>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub is_done: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub total: i64,
    pub items: Vec<Task>,
}

pub async fn create_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    validate_title(&request.title)?;

    let task = tasks::insert(
        &state.db,
        current_user.user_id,
        &request.title,
        request.body.as_deref(),
        request.due_at,
    )
    .await
    .map_err(ApiError::internal)?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let page = Page::clamped(query.limit, query.offset);

    let total = tasks::count(&state.db, current_user.user_id, query.is_done)
        .await
        .map_err(ApiError::internal)?;
    let items = tasks::list(&state.db, current_user.user_id, query.is_done, page)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(TaskListResponse { total, items }))
}

pub async fn task_stats(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> ApiResult<Json<TaskStats>> {
    let stats = tasks::stats(&state.db, current_user.user_id)
        .await
        .map_err(ApiError::internal)?;

    Ok(Json(stats))
}

pub async fn get_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = tasks::find(&state.db, current_user.user_id, task_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("task_not_found"))?;

    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(request): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    if let Some(title) = request.title.as_deref() {
        validate_title(title)?;
    }

    let task = tasks::update(
        &state.db,
        current_user.user_id,
        task_id,
        request.title.as_deref(),
        request.body.as_ref().map(|value| value.as_deref()),
        request.due_at,
        request.is_done,
    )
    .await
    .map_err(ApiError::internal)?
    .ok_or_else(|| ApiError::not_found("task_not_found"))?;

    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = tasks::delete(&state.db, current_user.user_id, task_id)
        .await
        .map_err(ApiError::internal)?;

    if !deleted {
        return Err(ApiError::not_found("task_not_found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_done(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    set_done(&state, current_user, task_id, true).await
}

pub async fn mark_undone(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    set_done(&state, current_user, task_id, false).await
}

async fn set_done(
    state: &AppState,
    current_user: CurrentUser,
    task_id: Uuid,
    is_done: bool,
) -> ApiResult<Json<Task>> {
    let task = tasks::set_done(&state.db, current_user.user_id, task_id, is_done)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found("task_not_found"))?;

    Ok(Json(task))
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::bad_request("invalid_title"));
    }
    Ok(())
}
