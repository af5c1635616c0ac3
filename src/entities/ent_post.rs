// Post entity - community feed rows

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};
use std::collections::HashMap;
use tracing::info;

use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{FeedPost, NewPost, Post, PostUpdate, PublicProfile},
};

const POST_COLUMNS: &str = "id, user_id, caption, content, image_url, created_at";

fn post_from_row(row: &SqliteRow) -> AppResult<Post> {
    let author: String = row.try_get("user_id")?;
    Ok(Post {
        id: row.try_get("id")?,
        user_id: author
            .parse()
            .map_err(|e: String| AppError::DatabaseError(format!("Corrupt post author: {}", e)))?,
        caption: row.try_get("caption")?,
        content: row.try_get("content")?,
        image_url: row.try_get("image_url")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Post {
    pub async fn gen(db: &Database, id: i64) -> AppResult<Post> {
        let row = sqlx::query(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))?;
        post_from_row(&row)
    }

    /// The feed: every post, newest first, with author profiles attached
    pub async fn gen_feed(db: &Database) -> AppResult<Vec<FeedPost>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM posts ORDER BY created_at DESC, id DESC",
            POST_COLUMNS
        ))
        .fetch_all(db.pool())
        .await?;
        let posts = rows.iter().map(post_from_row).collect::<AppResult<Vec<_>>>()?;

        let mut author_ids: Vec<i64> = posts.iter().filter_map(|p| p.user_id.user_id()).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors: HashMap<i64, PublicProfile> = PublicProfile::gen_many(db, &author_ids)
            .await?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let user = post.user_id.user_id().and_then(|id| authors.get(&id).cloned());
                FeedPost { post, user }
            })
            .collect())
    }

    pub async fn gen_feed_post(db: &Database, id: i64) -> AppResult<FeedPost> {
        let post = Self::gen(db, id).await?;
        let user = match post.user_id.user_id() {
            Some(author_id) => PublicProfile::gen_nullable(db, author_id).await?,
            None => None,
        };
        Ok(FeedPost { post, user })
    }

    pub async fn create(db: &Database, new_post: NewPost) -> AppResult<Post> {
        let result = sqlx::query(
            "INSERT INTO posts (user_id, caption, content, image_url, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(new_post.user_id.to_column())
        .bind(&new_post.caption)
        .bind(&new_post.content)
        .bind(&new_post.image_url)
        .bind(Utc::now())
        .execute(db.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!("Created post {} by {}", id, new_post.user_id);
        Self::gen(db, id).await
    }

    pub async fn update(db: &Database, id: i64, update: PostUpdate) -> AppResult<Post> {
        let result = sqlx::query(
            "UPDATE posts SET
                caption = CASE WHEN ? THEN ? ELSE caption END,
                content = CASE WHEN ? THEN ? ELSE content END,
                image_url = CASE WHEN ? THEN ? ELSE image_url END
            WHERE id = ?",
        )
        .bind(update.caption.is_some())
        .bind(update.caption.flatten())
        .bind(update.content.is_some())
        .bind(update.content.flatten())
        .bind(update.image_url.is_some())
        .bind(update.image_url.flatten())
        .bind(id)
        .execute(db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Post with id {} not found", id)));
        }
        Self::gen(db, id).await
    }

    pub async fn delete(db: &Database, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
