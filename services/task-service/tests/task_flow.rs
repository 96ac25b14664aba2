mod support;

use anyhow::{anyhow, Result};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

const PASSWORD: &str = "CorrectHorseBatteryStaple!";

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Result<axum::response::Response> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    Ok(app.clone().oneshot(builder.body(body)?).await?)
}

async fn json_body(response: axum::response::Response) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok(serde_json::from_slice(&bytes)?)
}

async fn register_and_login(app: &Router, prefix: &str) -> Result<(String, Uuid)> {
    let email = support::unique_email(prefix);
    let response = send_json(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": PASSWORD, "full_name": "Task Tester" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send_json(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let tokens = json_body(response).await?;
    let access = tokens["access_token"]
        .as_str()
        .ok_or_else(|| anyhow!("missing access token"))?
        .to_string();

    let response = send_json(app, "GET", "/user/me", Some(&access), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = json_body(response).await?;
    let user_id = Uuid::parse_str(
        profile["id"]
            .as_str()
            .ok_or_else(|| anyhow!("missing profile id"))?,
    )?;

    Ok((access, user_id))
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(
    not(feature = "integration"),
    ignore = "enable with --features integration (requires Postgres)"
)]
async fn task_crud_filtering_and_stats() -> Result<()> {
    let Some(db) = support::TestDatabase::setup().await? else {
        return Ok(());
    };
    let pool = db.pool_clone();
    let (state, _) = support::test_state(pool.clone());
    let app = task_service::app::build_router(state);

    let (access, user_id) = register_and_login(&app, "crud").await?;

    let response = send_json(
        &app,
        "POST",
        "/tasks",
        Some(&access),
        Some(json!({
            "title": "Write report",
            "body": "quarterly numbers",
            "due_at": "2026-09-01T12:00:00Z"
        })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = json_body(response).await?;
    assert_eq!(first["title"], json!("Write report"));
    assert_eq!(first["is_done"], json!(false));
    assert_eq!(first["owner_id"], json!(user_id.to_string()));
    let first_id = first["id"]
        .as_str()
        .ok_or_else(|| anyhow!("missing task id"))?
        .to_string();

    let response = send_json(
        &app,
        "POST",
        "/tasks",
        Some(&access),
        Some(json!({ "title": "" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await?;
    assert_eq!(body["code"], json!("invalid_title"));

    let response = send_json(
        &app,
        "POST",
        "/tasks",
        Some(&access),
        Some(json!({ "title": "Pay rent" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = json_body(response).await?;
    let second_id = second["id"]
        .as_str()
        .ok_or_else(|| anyhow!("missing task id"))?
        .to_string();
    assert_eq!(second["body"], Value::Null);

    let response = send_json(&app, "GET", "/tasks", Some(&access), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = json_body(response).await?;
    assert_eq!(listing["total"], json!(2));
    let items = listing["items"]
        .as_array()
        .ok_or_else(|| anyhow!("items not an array"))?;
    assert_eq!(items.len(), 2);
    // Newest first.
    assert_eq!(items[0]["title"], json!("Pay rent"));

    let response = send_json(
        &app,
        "PATCH",
        &format!("/tasks/{first_id}/done"),
        Some(&access),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let done = json_body(response).await?;
    assert_eq!(done["is_done"], json!(true));

    let response = send_json(&app, "GET", "/tasks?is_done=true", Some(&access), None).await?;
    let listing = json_body(response).await?;
    assert_eq!(listing["total"], json!(1));
    assert_eq!(listing["items"][0]["id"], json!(first_id));

    let response = send_json(&app, "GET", "/tasks?is_done=false", Some(&access), None).await?;
    let listing = json_body(response).await?;
    assert_eq!(listing["total"], json!(1));
    assert_eq!(listing["items"][0]["id"], json!(second_id));

    // Partial update keeps the fields the request leaves out.
    let response = send_json(
        &app,
        "PUT",
        &format!("/tasks/{second_id}"),
        Some(&access),
        Some(json!({ "title": "Pay rent (September)" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await?;
    assert_eq!(updated["title"], json!("Pay rent (September)"));
    assert_eq!(updated["is_done"], json!(false));
    assert_eq!(updated["body"], Value::Null);

    // An explicit null clears a nullable field; absence leaves it alone.
    let response = send_json(
        &app,
        "PUT",
        &format!("/tasks/{first_id}"),
        Some(&access),
        Some(json!({ "body": null })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = json_body(response).await?;
    assert_eq!(cleared["body"], Value::Null);
    assert_eq!(cleared["title"], json!("Write report"));
    assert!(cleared["due_at"].is_string());

    let response = send_json(
        &app,
        "PUT",
        &format!("/tasks/{first_id}"),
        Some(&access),
        Some(json!({ "due_at": null })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = json_body(response).await?;
    assert_eq!(cleared["due_at"], Value::Null);

    let response = send_json(&app, "GET", "/tasks/stats", Some(&access), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let stats = json_body(response).await?;
    assert_eq!(stats["total"], json!(2));
    assert_eq!(stats["completed"], json!(1));
    assert_eq!(stats["pending"], json!(1));

    let response = send_json(
        &app,
        "PATCH",
        &format!("/tasks/{first_id}/undone"),
        Some(&access),
        None,
    )
    .await?;
    let undone = json_body(response).await?;
    assert_eq!(undone["is_done"], json!(false));

    let response = send_json(
        &app,
        "DELETE",
        &format!("/tasks/{first_id}"),
        Some(&access),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send_json(
        &app,
        "GET",
        &format!("/tasks/{first_id}"),
        Some(&access),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send_json(
        &app,
        "DELETE",
        &format!("/tasks/{first_id}"),
        Some(&access),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Out-of-range paging values are clamped, not rejected.
    let response = send_json(&app, "GET", "/tasks?limit=500&offset=0", Some(&access), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let listing = json_body(response).await?;
    assert_eq!(listing["total"], json!(1));

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
#[cfg_attr(
    not(feature = "integration"),
    ignore = "enable with --features integration (requires Postgres)"
)]
async fn tasks_are_scoped_to_their_owner() -> Result<()> {
    let Some(db) = support::TestDatabase::setup().await? else {
        return Ok(());
    };
    let pool = db.pool_clone();
    let (state, _) = support::test_state(pool.clone());
    let app = task_service::app::build_router(state);

    let (owner_access, owner_id) = register_and_login(&app, "owner").await?;
    let (other_access, other_id) = register_and_login(&app, "other").await?;

    let response = send_json(
        &app,
        "POST",
        "/tasks",
        Some(&owner_access),
        Some(json!({ "title": "Private task" })),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let task = json_body(response).await?;
    let task_id = task["id"]
        .as_str()
        .ok_or_else(|| anyhow!("missing task id"))?
        .to_string();

    // Another account sees 404, never 403: existence is not disclosed.
    for (method, uri, body) in [
        ("GET", format!("/tasks/{task_id}"), None),
        (
            "PUT",
            format!("/tasks/{task_id}"),
            Some(json!({ "title": "Hijacked" })),
        ),
        ("PATCH", format!("/tasks/{task_id}/done"), None),
        ("DELETE", format!("/tasks/{task_id}"), None),
    ] {
        let response = send_json(&app, method, &uri, Some(&other_access), body).await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
        let body = json_body(response).await?;
        assert_eq!(body["code"], json!("task_not_found"));
    }

    let response = send_json(&app, "GET", "/tasks", Some(&other_access), None).await?;
    let listing = json_body(response).await?;
    assert_eq!(listing["total"], json!(0));

    // The owner still has it, untouched.
    let response = send_json(
        &app,
        "GET",
        &format!("/tasks/{task_id}"),
        Some(&owner_access),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let task = json_body(response).await?;
    assert_eq!(task["title"], json!("Private task"));
    assert_eq!(task["is_done"], json!(false));

    for id in [owner_id, other_id] {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&pool)
            .await?;
    }
    Ok(())
}
