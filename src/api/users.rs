// Users API - profiles and the friends graph

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    app_state::AppState,
    domains::friends,
    error::AppResult,
    middleware::Ctx,
    models::{NewUser, PublicProfile, User, UserUpdate},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FriendRequest {
    user_id: Option<i64>,
    friend_id: i64,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/username/{username}", get(get_user_by_username))
        .route("/friends/add", post(add_friend))
        .route("/friends/remove", post(remove_friend))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/friends", get(get_friends))
        .route("/{id}/followers", get(get_followers))
}

async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    Ok(Json(User::gen_all(&state.db).await?))
}

async fn create_user(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(new_user): Json<NewUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = User::create(&state.db, new_user).await?;
    info!("[{}] Created user {} ({})", ctx.request_id, user.id, user.username);
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<User>> {
    Ok(Json(User::gen(&state.db, id).await?))
}

async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<User>> {
    Ok(Json(User::gen_by_username(&state.db, &username).await?))
}

async fn update_user(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i64>,
    Json(update): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    let user = User::update(&state.db, id, update).await?;
    info!("[{}] Updated user {}", ctx.request_id, id);
    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    ctx: Ctx,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    if User::delete(&state.db, id).await? {
        info!("[{}] Deleted user {}", ctx.request_id, id);
    } else {
        warn!("[{}] Delete of unknown user {}", ctx.request_id, id);
    }
    Ok(super::deleted("User"))
}

async fn add_friend(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(request): Json<FriendRequest>,
) -> AppResult<Json<Value>> {
    let user_id = ctx.resolve_user(request.user_id, "userId")?;
    let follows_ids = friends::add_friend(&state.db, user_id, request.friend_id).await?;
    Ok(Json(json!({ "follows_ids": follows_ids })))
}

async fn remove_friend(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(request): Json<FriendRequest>,
) -> AppResult<Json<Value>> {
    let user_id = ctx.resolve_user(request.user_id, "userId")?;
    let follows_ids = friends::remove_friend(&state.db, user_id, request.friend_id).await?;
    Ok(Json(json!({ "follows_ids": follows_ids })))
}

async fn get_friends(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PublicProfile>>> {
    Ok(Json(friends::get_friends(&state.db, id).await?))
}

async fn get_followers(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<PublicProfile>>> {
    Ok(Json(friends::get_followers(&state.db, id).await?))
}
