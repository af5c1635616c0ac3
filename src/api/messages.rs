// Messages API - conversations between two users

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    app_state::AppState,
    domains::messaging,
    error::AppResult,
    middleware::Ctx,
    models::{Conversation, ConversationSummary, Message},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationRequest {
    user1_id: i64,
    user2_id: i64,
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    conversation_id: i64,
    sender_id: Option<i64>,
    content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadRequest {
    conversation_id: i64,
    user_id: Option<i64>,
}

// `{id}` is a user id on the first route and a conversation id on the second;
// both share one parameter name so the routes can coexist.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", post(get_or_create_conversation))
        .route("/conversations/{id}", get(list_conversations))
        .route("/conversations/{id}/messages", get(conversation_messages))
        .route("/send", post(send_message))
        .route("/read", post(mark_as_read))
}

async fn list_conversations(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> AppResult<Json<Vec<ConversationSummary>>> {
    Ok(Json(messaging::list_conversations(&state.db, user_id).await?))
}

async fn get_or_create_conversation(
    State(state): State<AppState>,
    Json(request): Json<ConversationRequest>,
) -> AppResult<Json<Conversation>> {
    let conversation =
        messaging::get_or_create_conversation(&state.db, request.user1_id, request.user2_id).await?;
    Ok(Json(conversation))
}

async fn conversation_messages(
    State(state): State<AppState>,
    Path(conversation_id): Path<i64>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(messaging::conversation_messages(&state.db, conversation_id).await?))
}

async fn send_message(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(request): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let sender_id = ctx.resolve_user(request.sender_id, "sender_id")?;
    let message =
        messaging::send_message(&state.db, request.conversation_id, sender_id, &request.content).await?;
    info!(
        "[{}] User {} sent message {} in conversation {}",
        ctx.request_id, sender_id, message.id, message.conversation_id
    );
    Ok((StatusCode::CREATED, Json(message)))
}

async fn mark_as_read(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(request): Json<MarkReadRequest>,
) -> AppResult<Json<Value>> {
    let user_id = ctx.resolve_user(request.user_id, "userId")?;
    let updated = messaging::mark_as_read(&state.db, request.conversation_id, user_id).await?;
    Ok(Json(json!({ "message": "Messages marked as read", "updated": updated })))
}
