// Conversation and Message entities - row loaders for direct messaging
//
// Loaders take any SQLx executor so the messaging domain can run them inside
// its own transactions as well as straight off the pool.

use sqlx::{sqlite::SqliteRow, Executor, Row, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::{Conversation, Message},
};

const CONVERSATION_COLUMNS: &str = "id, user_id_1, user_id_2, created_at, last_message_at";
const MESSAGE_COLUMNS: &str = "id, conversation_id, sender_id, content, created_at, read";

fn conversation_from_row(row: &SqliteRow) -> Result<Conversation, sqlx::Error> {
    Ok(Conversation {
        id: row.try_get("id")?,
        user_id_1: row.try_get("user_id_1")?,
        user_id_2: row.try_get("user_id_2")?,
        created_at: row.try_get("created_at")?,
        last_message_at: row.try_get("last_message_at")?,
    })
}

fn message_from_row(row: &SqliteRow) -> Result<Message, sqlx::Error> {
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        sender_id: row.try_get("sender_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        read: row.try_get("read")?,
    })
}

impl Conversation {
    pub async fn gen_nullable<'e, E>(executor: E, id: i64) -> AppResult<Option<Conversation>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(&format!("SELECT {} FROM conversations WHERE id = ?", CONVERSATION_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.as_ref().map(conversation_from_row).transpose()?)
    }

    pub async fn gen<'e, E>(executor: E, id: i64) -> AppResult<Conversation>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Self::gen_nullable(executor, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation with id {} not found", id)))
    }

    /// Lookup by canonical pair; callers must pass `user_id_1 < user_id_2`
    pub async fn gen_by_pair<'e, E>(executor: E, user_id_1: i64, user_id_2: i64) -> AppResult<Option<Conversation>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(&format!(
            "SELECT {} FROM conversations WHERE user_id_1 = ? AND user_id_2 = ?",
            CONVERSATION_COLUMNS
        ))
        .bind(user_id_1)
        .bind(user_id_2)
        .fetch_optional(executor)
        .await?;
        Ok(row.as_ref().map(conversation_from_row).transpose()?)
    }

    /// Every conversation `user_id` takes part in, most recently active first.
    /// Conversations without messages sort last.
    pub async fn gen_for_user<'e, E>(executor: E, user_id: i64) -> AppResult<Vec<Conversation>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM conversations
             WHERE user_id_1 = ? OR user_id_2 = ?
             ORDER BY last_message_at IS NULL, last_message_at DESC, id DESC",
            CONVERSATION_COLUMNS
        ))
        .bind(user_id)
        .bind(user_id)
        .fetch_all(executor)
        .await?;
        Ok(rows.iter().map(conversation_from_row).collect::<Result<_, _>>()?)
    }
}

impl Message {
    pub async fn gen<'e, E>(executor: E, id: i64) -> AppResult<Message>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query(&format!("SELECT {} FROM messages WHERE id = ?", MESSAGE_COLUMNS))
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message with id {} not found", id)))?;
        Ok(message_from_row(&row)?)
    }

    /// Messages of a conversation in the order they were sent
    pub async fn gen_for_conversation<'e, E>(executor: E, conversation_id: i64) -> AppResult<Vec<Message>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
            MESSAGE_COLUMNS
        ))
        .bind(conversation_id)
        .fetch_all(executor)
        .await?;
        Ok(rows.iter().map(message_from_row).collect::<Result<_, _>>()?)
    }
}
