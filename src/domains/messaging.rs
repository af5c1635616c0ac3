// Direct messaging - conversation identity, sending and read receipts
//
// A conversation is identified by its canonical pair (smaller id, larger id).
// The store enforces one row per pair, so get-or-create is an insert that
// tolerates the conflict followed by a lookup.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{Conversation, ConversationSummary, Message, PublicProfile, User},
};

/// Order a pair of participants canonically. A user cannot message themselves.
pub fn canonical_pair(a: i64, b: i64) -> AppResult<(i64, i64)> {
    if a == b {
        return Err(AppError::BadRequest(
            "A conversation needs two different users".to_string(),
        ));
    }
    Ok((a.min(b), a.max(b)))
}

pub async fn get_or_create_conversation(db: &Database, a: i64, b: i64) -> AppResult<Conversation> {
    let (user_id_1, user_id_2) = canonical_pair(a, b)?;
    for user_id in [user_id_1, user_id_2] {
        if !User::exists(db, user_id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", user_id)));
        }
    }

    let result = sqlx::query(
        "INSERT INTO conversations (user_id_1, user_id_2, created_at) VALUES (?, ?, ?)
         ON CONFLICT (user_id_1, user_id_2) DO NOTHING",
    )
    .bind(user_id_1)
    .bind(user_id_2)
    .bind(Utc::now())
    .execute(db.pool())
    .await?;

    if result.rows_affected() > 0 {
        info!("Started conversation between {} and {}", user_id_1, user_id_2);
    }

    Conversation::gen_by_pair(db.pool(), user_id_1, user_id_2)
        .await?
        .ok_or_else(|| {
            AppError::DatabaseError(format!(
                "Conversation between {} and {} vanished after insert",
                user_id_1, user_id_2
            ))
        })
}

/// The user's inbox, most recently active first, each entry carrying the peer's profile
pub async fn list_conversations(db: &Database, user_id: i64) -> AppResult<Vec<ConversationSummary>> {
    let conversations = Conversation::gen_for_user(db.pool(), user_id).await?;

    let peer_ids: Vec<i64> = conversations
        .iter()
        .map(|c| c.other_participant(user_id))
        .collect();
    let peers: HashMap<i64, PublicProfile> = PublicProfile::gen_many(db, &peer_ids)
        .await?
        .into_iter()
        .map(|profile| (profile.id, profile))
        .collect();

    Ok(conversations
        .into_iter()
        .map(|conversation| {
            let other_user = peers.get(&conversation.other_participant(user_id)).cloned();
            ConversationSummary {
                conversation,
                other_user,
            }
        })
        .collect())
}

pub async fn conversation_messages(db: &Database, conversation_id: i64) -> AppResult<Vec<Message>> {
    Conversation::gen(db.pool(), conversation_id).await?;
    Message::gen_for_conversation(db.pool(), conversation_id).await
}

/// Store a message and bump the conversation's `last_message_at` in one
/// transaction. `last_message_at` never moves backwards.
pub async fn send_message(
    db: &Database,
    conversation_id: i64,
    sender_id: i64,
    content: &str,
) -> AppResult<Message> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("message content is required".to_string()));
    }

    let mut tx = db.pool().begin().await?;
    let created_at = Utc::now();

    // Write before any read: SQLite will not upgrade a reading transaction
    // to a writer while another connection holds the write lock.
    let bumped = sqlx::query(
        "UPDATE conversations
         SET last_message_at = CASE
             WHEN last_message_at IS NULL OR last_message_at < ? THEN ?
             ELSE last_message_at
         END
         WHERE id = ? AND (user_id_1 = ? OR user_id_2 = ?)",
    )
    .bind(created_at)
    .bind(created_at)
    .bind(conversation_id)
    .bind(sender_id)
    .bind(sender_id)
    .execute(&mut *tx)
    .await?;

    if bumped.rows_affected() == 0 {
        // 404 when the conversation is missing, otherwise the sender is an outsider
        Conversation::gen(&mut *tx, conversation_id).await?;
        return Err(AppError::Forbidden(format!(
            "User {} is not a participant of conversation {}",
            sender_id, conversation_id
        )));
    }

    let result = sqlx::query(
        "INSERT INTO messages (conversation_id, sender_id, content, created_at, read) VALUES (?, ?, ?, ?, 0)",
    )
    .bind(conversation_id)
    .bind(sender_id)
    .bind(content)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;
    let message_id = result.last_insert_rowid();

    let message = Message::gen(&mut *tx, message_id).await?;
    tx.commit().await?;

    debug!("User {} sent message {} in conversation {}", sender_id, message_id, conversation_id);
    Ok(message)
}

/// Flip every unread message in the conversation that `user_id` did not send.
/// Returns how many messages changed.
pub async fn mark_as_read(db: &Database, conversation_id: i64, user_id: i64) -> AppResult<u64> {
    let result = sqlx::query(
        "UPDATE messages SET read = 1 WHERE conversation_id = ? AND sender_id <> ? AND read = 0",
    )
    .bind(conversation_id)
    .bind(user_id)
    .execute(db.pool())
    .await?;

    debug!(
        "Marked {} messages read in conversation {} for user {}",
        result.rows_affected(),
        conversation_id,
        user_id
    );
    Ok(result.rows_affected())
}
