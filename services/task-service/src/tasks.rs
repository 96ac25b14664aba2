use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub body: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct TaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
}

/// Listing window, normalized to safe bounds before it reaches SQL.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

const TASK_COLUMNS: &str = "id, owner_id, title, body, due_at, is_done, created_at, updated_at";

pub async fn insert(
    db: &PgPool,
    owner_id: Uuid,
    title: &str,
    body: Option<&str>,
    due_at: Option<DateTime<Utc>>,
) -> Result<Task, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        r#"INSERT INTO tasks (id, owner_id, title, body, due_at)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING {TASK_COLUMNS}"#,
    ))
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(body)
    .bind(due_at)
    .fetch_one(db)
    .await
}

pub async fn find(db: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND owner_id = $2"
    ))
    .bind(task_id)
    .bind(owner_id)
    .fetch_optional(db)
    .await
}

pub async fn list(
    db: &PgPool,
    owner_id: Uuid,
    is_done: Option<bool>,
    page: Page,
) -> Result<Vec<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        r#"SELECT {TASK_COLUMNS} FROM tasks
           WHERE owner_id = $1 AND ($2::boolean IS NULL OR is_done = $2)
           ORDER BY created_at DESC
           LIMIT $3 OFFSET $4"#,
    ))
    .bind(owner_id)
    .bind(is_done)
    .bind(page.limit)
    .bind(page.offset)
    .fetch_all(db)
    .await
}

pub async fn count(db: &PgPool, owner_id: Uuid, is_done: Option<bool>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM tasks WHERE owner_id = $1 AND ($2::boolean IS NULL OR is_done = $2)",
    )
    .bind(owner_id)
    .bind(is_done)
    .fetch_one(db)
    .await
}

/// Partial update: absent fields keep their stored values. The nullable
/// columns take a double-wrapped option so that an explicit null clears
/// them, which COALESCE alone cannot express.
pub async fn update(
    db: &PgPool,
    owner_id: Uuid,
    task_id: Uuid,
    title: Option<&str>,
    body: Option<Option<&str>>,
    due_at: Option<Option<DateTime<Utc>>>,
    is_done: Option<bool>,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        r#"UPDATE tasks
           SET title = COALESCE($3, title),
               body = CASE WHEN $4 THEN $5 ELSE body END,
               due_at = CASE WHEN $6 THEN $7 ELSE due_at END,
               is_done = COALESCE($8, is_done),
               updated_at = now()
           WHERE id = $1 AND owner_id = $2
           RETURNING {TASK_COLUMNS}"#,
    ))
    .bind(task_id)
    .bind(owner_id)
    .bind(title)
    .bind(body.is_some())
    .bind(body.flatten())
    .bind(due_at.is_some())
    .bind(due_at.flatten())
    .bind(is_done)
    .fetch_optional(db)
    .await
}

pub async fn set_done(
    db: &PgPool,
    owner_id: Uuid,
    task_id: Uuid,
    is_done: bool,
) -> Result<Option<Task>, sqlx::Error> {
    sqlx::query_as::<_, Task>(&format!(
        r#"UPDATE tasks SET is_done = $3, updated_at = now()
           WHERE id = $1 AND owner_id = $2
           RETURNING {TASK_COLUMNS}"#,
    ))
    .bind(task_id)
    .bind(owner_id)
    .bind(is_done)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, owner_id: Uuid, task_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND owner_id = $2")
        .bind(task_id)
        .bind(owner_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn stats(db: &PgPool, owner_id: Uuid) -> Result<TaskStats, sqlx::Error> {
    sqlx::query_as::<_, TaskStats>(
        r#"SELECT COUNT(*) AS total,
                  COUNT(*) FILTER (WHERE is_done) AS completed,
                  COUNT(*) FILTER (WHERE NOT is_done) AS pending
           FROM tasks WHERE owner_id = $1"#,
    )
    .bind(owner_id)
    .fetch_one(db)
    .await
}
