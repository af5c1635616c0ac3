// User entity - profile rows plus the friend set materialised as follows_ids

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, types::Json, QueryBuilder, Row, Sqlite};
use tracing::{debug, info};

use crate::{
    database::Database,
    domains::friends,
    error::{AppError, AppResult},
    models::{FollowsIds, NewUser, PublicProfile, User, UserUpdate},
};

const USER_COLUMNS: &str = "id, username, display_name, bio, pfp, interests, created_at";

fn user_from_row(row: &SqliteRow, follows_ids: FollowsIds) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        bio: row.try_get("bio")?,
        pfp: row.try_get("pfp")?,
        interests: row.try_get::<Json<Vec<String>>, _>("interests")?.0,
        follows_ids,
        created_at: row.try_get("created_at")?,
    })
}

pub(crate) fn profile_from_row(row: &SqliteRow) -> Result<PublicProfile, sqlx::Error> {
    Ok(PublicProfile {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        pfp: row.try_get("pfp")?,
        interests: row.try_get::<Json<Vec<String>>, _>("interests")?.0,
    })
}

impl User {
    pub async fn gen_nullable(db: &Database, id: i64) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(db.pool())
            .await?;

        match row {
            Some(row) => {
                let follows_ids = friends::follows_ids(db, id).await?;
                Ok(Some(user_from_row(&row, follows_ids)?))
            }
            None => Ok(None),
        }
    }

    pub async fn gen(db: &Database, id: i64) -> AppResult<User> {
        Self::gen_nullable(db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    pub async fn gen_by_username(db: &Database, username: &str) -> AppResult<User> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE username = ?", USER_COLUMNS))
            .bind(username)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))?;

        let id: i64 = row.try_get("id")?;
        let follows_ids = friends::follows_ids(db, id).await?;
        Ok(user_from_row(&row, follows_ids)?)
    }

    pub async fn gen_all(db: &Database) -> AppResult<Vec<User>> {
        let rows = sqlx::query(&format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS))
            .fetch_all(db.pool())
            .await?;
        let mut follows_by_user = friends::all_follows_ids(db).await?;

        rows.iter()
            .map(|row| -> AppResult<User> {
                let id: i64 = row.try_get("id")?;
                let follows_ids = follows_by_user.remove(&id).unwrap_or_default();
                Ok(user_from_row(row, follows_ids)?)
            })
            .collect()
    }

    pub async fn exists(db: &Database, id: i64) -> AppResult<bool> {
        let found = sqlx::query("SELECT 1 FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?;
        Ok(found.is_some())
    }

    pub async fn create(db: &Database, new_user: NewUser) -> AppResult<User> {
        new_user.validate()?;

        let result = sqlx::query(
            "INSERT INTO users (username, display_name, bio, pfp, interests, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_user.username)
        .bind(&new_user.display_name)
        .bind(&new_user.bio)
        .bind(&new_user.pfp)
        .bind(Json(&new_user.interests))
        .bind(Utc::now())
        .execute(db.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!("Created user {} ({})", new_user.username, id);
        Self::gen(db, id).await
    }

    pub async fn update(db: &Database, id: i64, update: UserUpdate) -> AppResult<User> {
        update.validate()?;

        let mut tx = db.pool().begin().await?;
        let result = sqlx::query(
            "UPDATE users SET
                username = COALESCE(?, username),
                display_name = CASE WHEN ? THEN ? ELSE display_name END,
                bio = CASE WHEN ? THEN ? ELSE bio END,
                pfp = CASE WHEN ? THEN ? ELSE pfp END,
                interests = COALESCE(?, interests)
            WHERE id = ?",
        )
        .bind(&update.username)
        .bind(update.display_name.is_some())
        .bind(update.display_name.clone().flatten())
        .bind(update.bio.is_some())
        .bind(update.bio.clone().flatten())
        .bind(update.pfp.is_some())
        .bind(update.pfp.clone().flatten())
        .bind(update.interests.as_ref().map(Json))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }

        if let Some(follows_ids) = &update.follows_ids {
            friends::replace_follows(&mut tx, id, follows_ids).await?;
        }

        tx.commit().await?;
        debug!("Updated user {}", id);
        Self::gen(db, id).await
    }

    /// Returns whether a row was removed. Friendships, conversations and
    /// messages of the user go with it.
    pub async fn delete(db: &Database, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

impl PublicProfile {
    pub async fn gen_nullable(db: &Database, id: i64) -> AppResult<Option<PublicProfile>> {
        let row = sqlx::query("SELECT id, username, pfp, interests FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?;
        Ok(row.as_ref().map(profile_from_row).transpose()?)
    }

    /// Batch lookup in one query. Unknown ids are skipped; results come back in id order.
    pub async fn gen_many(db: &Database, ids: &[i64]) -> AppResult<Vec<PublicProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT id, username, pfp, interests FROM users WHERE id IN (");
        let mut separated = qb.separated(",");
        for id in ids {
            separated.push_bind(*id);
        }
        qb.push(") ORDER BY id");

        let rows = qb.build().fetch_all(db.pool()).await?;
        Ok(rows.iter().map(profile_from_row).collect::<Result<_, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            display_name: None,
            bio: None,
            pfp: None,
            interests: vec![],
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let db = Database::in_memory().await.unwrap();
        let created = User::create(
            &db,
            NewUser {
                username: "maya".to_string(),
                display_name: Some("Maya R.".to_string()),
                bio: Some("Robotics club".to_string()),
                pfp: Some("https://img.example/maya.png".to_string()),
                interests: vec!["robotics".to_string(), "climbing".to_string()],
            },
        )
        .await
        .unwrap();

        assert_eq!(created.username, "maya");
        assert!(created.follows_ids.is_empty());

        let by_id = User::gen(&db, created.id).await.unwrap();
        assert_eq!(by_id, created);

        let by_name = User::gen_by_username(&db, "maya").await.unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_name.interests, vec!["robotics", "climbing"]);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let db = Database::in_memory().await.unwrap();
        User::create(&db, new_user("sam")).await.unwrap();

        let err = User::create(&db, new_user("sam")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let db = Database::in_memory().await.unwrap();
        let mut input = new_user("lee");
        input.bio = Some("original bio".to_string());
        let user = User::create(&db, input).await.unwrap();

        let updated = User::update(
            &db,
            user.id,
            UserUpdate {
                display_name: Some(Some("Lee".to_string())),
                interests: Some(vec!["film".to_string()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.display_name.as_deref(), Some("Lee"));
        assert_eq!(updated.bio.as_deref(), Some("original bio"));
        assert_eq!(updated.interests, vec!["film"]);
    }

    #[tokio::test]
    async fn test_update_with_null_clears_field() {
        let db = Database::in_memory().await.unwrap();
        let mut input = new_user("kai");
        input.bio = Some("temporary".to_string());
        input.pfp = Some("https://img.example/kai.png".to_string());
        let user = User::create(&db, input).await.unwrap();

        let update: UserUpdate = serde_json::from_value(serde_json::json!({ "bio": null })).unwrap();
        let updated = User::update(&db, user.id, update).await.unwrap();

        assert_eq!(updated.bio, None);
        assert_eq!(updated.pfp.as_deref(), Some("https://img.example/kai.png"));
    }

    #[tokio::test]
    async fn test_update_and_get_missing_user() {
        let db = Database::in_memory().await.unwrap();

        assert!(User::gen_nullable(&db, 99).await.unwrap().is_none());
        assert!(matches!(User::gen(&db, 99).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            User::update(&db, 99, UserUpdate::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(!User::delete(&db, 99).await.unwrap());
    }

    #[tokio::test]
    async fn test_gen_many_profiles_skips_unknown_ids() {
        let db = Database::in_memory().await.unwrap();
        let a = User::create(&db, new_user("a")).await.unwrap();
        let b = User::create(&db, new_user("b")).await.unwrap();

        let profiles = PublicProfile::gen_many(&db, &[b.id, 404, a.id]).await.unwrap();
        let ids: Vec<i64> = profiles.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);

        assert!(PublicProfile::gen_many(&db, &[]).await.unwrap().is_empty());
    }
}
