mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{call, create_user, get, post, test_app};

#[tokio::test]
async fn test_conversation_is_shared_by_both_orders() {
    let app = test_app().await;
    let a = create_user(&app, "a").await;
    let b = create_user(&app, "b").await;

    let (status, forward) = post(&app, "/api/messages/conversations", json!({ "user1Id": b, "user2Id": a })).await;
    assert_eq!(status, StatusCode::OK);
    let (_, backward) = post(&app, "/api/messages/conversations", json!({ "user1Id": a, "user2Id": b })).await;

    assert_eq!(forward["id"], backward["id"]);
    assert_eq!(forward["user_id_1"], a.min(b));
    assert_eq!(forward["user_id_2"], a.max(b));
    assert!(forward["last_message_at"].is_null());
}

#[tokio::test]
async fn test_self_conversation_is_rejected() {
    let app = test_app().await;
    let a = create_user(&app, "a").await;

    let (status, _) = post(&app, "/api/messages/conversations", json!({ "user1Id": a, "user2Id": a })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_send_list_and_mark_read() {
    let app = test_app().await;
    let a = create_user(&app, "a").await;
    let b = create_user(&app, "b").await;
    let (_, conversation) = post(&app, "/api/messages/conversations", json!({ "user1Id": a, "user2Id": b })).await;
    let conversation_id = conversation["id"].as_i64().unwrap();

    let (status, sent) = post(
        &app,
        "/api/messages/send",
        json!({ "conversation_id": conversation_id, "sender_id": a, "content": "hey" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["read"], false);

    // sender taken from the viewer header
    let (status, _) = call(
        &app,
        Method::POST,
        "/api/messages/send",
        Some(json!({ "conversation_id": conversation_id, "content": "hi back" })),
        Some(b),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, messages) = get(&app, &format!("/api/messages/conversations/{}/messages", conversation_id)).await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> = messages
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|m| m["content"].as_str())
        .collect();
    assert_eq!(contents, vec!["hey", "hi back"]);

    let (status, inbox) = get(&app, &format!("/api/messages/conversations/{}", a)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox[0]["id"], conversation_id);
    assert_eq!(inbox[0]["otherUser"]["username"], "b");
    assert!(inbox[0]["last_message_at"].is_string());

    let (status, body) = post(&app, "/api/messages/read", json!({ "conversationId": conversation_id, "userId": a })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Messages marked as read", "updated": 1 }));
}

#[tokio::test]
async fn test_send_errors() {
    let app = test_app().await;
    let a = create_user(&app, "a").await;
    let b = create_user(&app, "b").await;
    let outsider = create_user(&app, "c").await;
    let (_, conversation) = post(&app, "/api/messages/conversations", json!({ "user1Id": a, "user2Id": b })).await;
    let conversation_id = conversation["id"].as_i64().unwrap();

    let (status, _) = post(
        &app,
        "/api/messages/send",
        json!({ "conversation_id": conversation_id, "sender_id": outsider, "content": "hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(
        &app,
        "/api/messages/send",
        json!({ "conversation_id": 4040, "sender_id": a, "content": "hello" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post(
        &app,
        "/api/messages/send",
        json!({ "conversation_id": conversation_id, "sender_id": a, "content": "" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/messages/send",
        json!({ "conversation_id": conversation_id, "content": "who am i" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
