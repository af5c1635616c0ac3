// Posts API - community feed

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    error::AppResult,
    middleware::Ctx,
    models::{FeedPost, NewPost, Post, PostUpdate},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
}

async fn list_posts(State(state): State<AppState>) -> AppResult<Json<Vec<FeedPost>>> {
    Ok(Json(Post::gen_feed(&state.db).await?))
}

async fn create_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(new_post): Json<NewPost>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = Post::create(&state.db, new_post).await?;
    info!("[{}] Created post {}", ctx.request_id, post.id);
    Ok((StatusCode::CREATED, Json(post)))
}

async fn get_post(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<FeedPost>> {
    Ok(Json(Post::gen_feed_post(&state.db, id).await?))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<PostUpdate>,
) -> AppResult<Json<Post>> {
    Ok(Json(Post::update(&state.db, id, update).await?))
}

async fn delete_post(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if !Post::delete(&state.db, id).await? {
        warn!("[{}] Delete of unknown post {}", ctx.request_id, id);
    }
    Ok(super::deleted("Post"))
}
