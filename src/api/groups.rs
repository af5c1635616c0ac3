// Groups API

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use tracing::warn;

use crate::{
    app_state::AppState,
    error::AppResult,
    middleware::Ctx,
    models::{Group, GroupUpdate, NewGroup},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/{id}", get(get_group).put(update_group).delete(delete_group))
}

async fn list_groups(State(state): State<AppState>) -> AppResult<Json<Vec<Group>>> {
    Ok(Json(Group::gen_all(&state.db).await?))
}

async fn create_group(
    State(state): State<AppState>,
    Json(new_group): Json<NewGroup>,
) -> AppResult<(StatusCode, Json<Group>)> {
    Ok((StatusCode::CREATED, Json(Group::create(&state.db, new_group).await?)))
}

async fn get_group(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Group>> {
    Ok(Json(Group::gen(&state.db, id).await?))
}

async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<GroupUpdate>,
) -> AppResult<Json<Group>> {
    Ok(Json(Group::update(&state.db, id, update).await?))
}

async fn delete_group(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !Group::delete(&state.db, id).await? {
        warn!("[{}] Delete of unknown group {}", ctx.request_id, id);
    }
    Ok(super::deleted("Group"))
}
