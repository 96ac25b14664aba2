use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::auth_handlers::{login, logout, refresh, register};
use crate::auth_service::AuthService;
use crate::metrics::ServiceMetrics;
use crate::task_handlers::{
    create_task, delete_task, get_task, list_tasks, mark_done, mark_undone, task_stats,
    update_task,
};
use crate::user_handlers::me;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth: AuthService,
    pub metrics: Arc<ServiceMetrics>,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(response) => response,
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {err}"),
        )
            .into_response(),
    }
}

pub fn build_router(state: AppState) -> Router {
    let allowed_origins = [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:5173",
    ];
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            ACCEPT,
            CONTENT_TYPE,
            HeaderName::from_static("authorization"),
        ]);

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/user/me", get(me))
        .route("/tasks", post(create_task).get(list_tasks))
        .route("/tasks/stats", get(task_stats))
        .route(
            "/tasks/:task_id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:task_id/done", patch(mark_done))
        .route("/tasks/:task_id/undone", patch(mark_undone))
        .with_state(state)
        .layer(cors)
}
