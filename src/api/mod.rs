// HTTP API - one router per resource, nested under /api

pub mod groups;
pub mod messages;
pub mod posts;
pub mod users;

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{app_state::AppState, middleware::request_context_middleware};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .nest("/api/users", users::router())
        .nest("/api/posts", posts::router())
        .nest("/api/groups", groups::router())
        .nest("/api/messages", messages::router())
        .layer(middleware::from_fn(request_context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "message": "Lexington Links API is running" }))
}

/// Body returned by every DELETE endpoint
pub(crate) fn deleted(kind: &str) -> Json<Value> {
    Json(json!({ "message": format!("{} deleted successfully", kind) }))
}
