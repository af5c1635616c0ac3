// Shared helpers for router-level tests

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use lexington_links::{api::create_router, app_state::AppState, database::Database};

pub async fn test_app() -> Router {
    let db = Database::in_memory().await.unwrap();
    create_router(AppState::from_database(db))
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    viewer: Option<i64>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user_id) = viewer {
        builder = builder.header("x-user-id", user_id.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    call(app, Method::GET, uri, None, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, Some(body), None).await
}

pub async fn create_user(app: &Router, username: &str) -> i64 {
    let (status, user) = post(
        app,
        "/api/users",
        serde_json::json!({
            "username": username,
            "pfp": format!("https://img.example/{}.png", username),
            "interests": ["music"]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "creating {}: {}", username, user);
    user["id"].as_i64().unwrap()
}
