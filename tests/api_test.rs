mod common;

use std::sync::Arc;

use atelier::api::create_app;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{add_member, add_workshop, context, workshop};

async fn app() -> anyhow::Result<(Router, Arc<atelier::service::ServiceContext>)> {
    let ctx = Arc::new(context().await?);
    Ok((create_app(ctx.clone()), ctx))
}

async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, body))
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_create_and_list_workshops() -> anyhow::Result<()> {
    let (app, _ctx) = app().await?;

    let (status, created) = send(&app, json_request(
        "POST",
        "/api/workshops",
        json!({ "title": "Screen printing", "date": "2024-06-01", "time": "18:30" }),
    )).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["time"], "18:30");
    assert_eq!(created["location"], "TBD");

    let (status, listed) = send(
        &app,
        Request::builder().uri("/api/workshops").body(Body::empty())?,
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 1);

    Ok(())
}

#[tokio::test]
async fn test_create_with_bad_time_is_unprocessable() -> anyhow::Result<()> {
    let (app, _ctx) = app().await?;

    let (status, body) = send(&app, json_request(
        "POST",
        "/api/workshops",
        json!({ "title": "Screen printing", "date": "2024-06-01", "time": "evening" }),
    )).await?;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("evening"));

    Ok(())
}

#[tokio::test]
async fn test_attendance_roundtrip() -> anyhow::Result<()> {
    let (app, ctx) = app().await?;
    add_workshop(&ctx, workshop("1", "2024-01-01", "14:05")).await?;
    add_member(&ctx, "A", &["1"]).await?;
    add_member(&ctx, "B", &["1"]).await?;

    let (status, body) = send(&app, json_request(
        "POST",
        "/api/workshops/1/attendance",
        json!({ "toggles": [{ "member_id": "A", "present": true }], "finalize": true }),
    )).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Attendance marked for 2 members for Workshop 1");
    assert_eq!(body["report"]["attendance_taken"], true);

    let (status, roster) = send(
        &app,
        Request::builder().uri("/api/workshops/1/attendance").body(Body::empty())?,
    ).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster["members"][0]["mark"], "present");
    assert_eq!(roster["members"][1]["mark"], "unset");

    Ok(())
}

#[tokio::test]
async fn test_unknown_member_toggle_is_rejected() -> anyhow::Result<()> {
    let (app, ctx) = app().await?;
    add_workshop(&ctx, workshop("1", "2024-01-01", "14:05")).await?;

    let (status, _) = send(&app, json_request(
        "POST",
        "/api/workshops/1/attendance",
        json!({ "toggles": [{ "member_id": "ghost", "present": true }] }),
    )).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let stored = ctx.workshop_repo.find_by_id("1").await?.unwrap();
    assert!(stored.attendance_state.is_none());

    Ok(())
}

#[tokio::test]
async fn test_delete_needs_confirm() -> anyhow::Result<()> {
    let (app, ctx) = app().await?;
    add_workshop(&ctx, workshop("1", "2024-01-01", "14:05")).await?;

    let delete = |uri: &str| Request::builder().method("DELETE").uri(uri).body(Body::empty());

    let (status, _) = send(&app, delete("/api/workshops/1")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, delete("/api/workshops/1?confirm=true")?).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, delete("/api/workshops/1?confirm=true")?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_root_and_health() -> anyhow::Result<()> {
    let (app, _) = app().await?;

    let (status, body) = send(&app, Request::builder().uri("/").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["workshops"], "/api/workshops");

    let (status, body) = send(&app, Request::builder().uri("/health").body(Body::empty())?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    Ok(())
}
