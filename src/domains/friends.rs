// Friends graph - directed "follows" edges exposed on the user as follows_ids
//
// Each edge is one row in `friendships` keyed by (user_id, friend_id), so
// add/remove are single statements and concurrent calls cannot lose updates.

use chrono::Utc;
use sqlx::{Row, SqliteConnection};
use std::collections::HashMap;
use tracing::info;

use crate::{
    database::Database,
    entities::ent_user::profile_from_row,
    error::{AppError, AppResult},
    models::{FollowsIds, PublicProfile, User},
};

/// Mark `friend_id` as a friend of `user_id`. Idempotent; the friend's own
/// follows_ids is left untouched.
pub async fn add_friend(db: &Database, user_id: i64, friend_id: i64) -> AppResult<FollowsIds> {
    if user_id == friend_id {
        return Err(AppError::BadRequest("A user cannot add themselves as a friend".to_string()));
    }
    ensure_user(db, user_id).await?;
    ensure_user(db, friend_id).await?;

    sqlx::query(
        "INSERT INTO friendships (user_id, friend_id, created_at) VALUES (?, ?, ?)
         ON CONFLICT (user_id, friend_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(friend_id)
    .bind(Utc::now())
    .execute(db.pool())
    .await?;

    info!("User {} added friend {}", user_id, friend_id);
    follows_ids(db, user_id).await
}

/// Drop `friend_id` from the user's follows_ids. Removing an absent key is a no-op.
pub async fn remove_friend(db: &Database, user_id: i64, friend_id: i64) -> AppResult<FollowsIds> {
    ensure_user(db, user_id).await?;

    let result = sqlx::query("DELETE FROM friendships WHERE user_id = ? AND friend_id = ?")
        .bind(user_id)
        .bind(friend_id)
        .execute(db.pool())
        .await?;

    if result.rows_affected() > 0 {
        info!("User {} removed friend {}", user_id, friend_id);
    }
    follows_ids(db, user_id).await
}

/// Public profiles of everyone the user has friended, in one batch query
pub async fn get_friends(db: &Database, user_id: i64) -> AppResult<Vec<PublicProfile>> {
    ensure_user(db, user_id).await?;

    let rows = sqlx::query(
        "SELECT u.id, u.username, u.pfp, u.interests
         FROM friendships f JOIN users u ON u.id = f.friend_id
         WHERE f.user_id = ?
         ORDER BY u.id",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    Ok(rows.iter().map(profile_from_row).collect::<Result<_, _>>()?)
}

/// Reverse direction: everyone who has friended `user_id`
pub async fn get_followers(db: &Database, user_id: i64) -> AppResult<Vec<PublicProfile>> {
    ensure_user(db, user_id).await?;

    let rows = sqlx::query(
        "SELECT u.id, u.username, u.pfp, u.interests
         FROM friendships f JOIN users u ON u.id = f.user_id
         WHERE f.friend_id = ?
         ORDER BY u.id",
    )
    .bind(user_id)
    .fetch_all(db.pool())
    .await?;

    Ok(rows.iter().map(profile_from_row).collect::<Result<_, _>>()?)
}

pub async fn follows_ids(db: &Database, user_id: i64) -> AppResult<FollowsIds> {
    let rows = sqlx::query("SELECT friend_id FROM friendships WHERE user_id = ?")
        .bind(user_id)
        .fetch_all(db.pool())
        .await?;

    rows.iter()
        .map(|row| -> AppResult<(String, bool)> {
            Ok((row.try_get::<i64, _>("friend_id")?.to_string(), true))
        })
        .collect()
}

/// follows_ids for every user that has at least one friend
pub async fn all_follows_ids(db: &Database) -> AppResult<HashMap<i64, FollowsIds>> {
    let rows = sqlx::query("SELECT user_id, friend_id FROM friendships")
        .fetch_all(db.pool())
        .await?;

    let mut by_user: HashMap<i64, FollowsIds> = HashMap::new();
    for row in rows {
        let user_id: i64 = row.try_get("user_id")?;
        let friend_id: i64 = row.try_get("friend_id")?;
        by_user.entry(user_id).or_default().insert(friend_id.to_string(), true);
    }
    Ok(by_user)
}

/// Replace the whole friend set with the keys of `follows` whose value is true.
/// Runs on the caller's connection so a profile edit applies it atomically.
pub async fn replace_follows(
    conn: &mut SqliteConnection,
    user_id: i64,
    follows: &FollowsIds,
) -> AppResult<()> {
    let friend_ids = parse_follows(user_id, follows)?;

    sqlx::query("DELETE FROM friendships WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *conn)
        .await?;

    let now = Utc::now();
    for friend_id in friend_ids {
        sqlx::query("INSERT INTO friendships (user_id, friend_id, created_at) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(friend_id)
            .bind(now)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

fn parse_follows(user_id: i64, follows: &FollowsIds) -> AppResult<Vec<i64>> {
    follows
        .iter()
        .filter(|(_, present)| **present)
        .map(|(key, _)| -> AppResult<i64> {
            let friend_id: i64 = key
                .trim()
                .parse()
                .map_err(|_| AppError::Validation(format!("follows_ids key '{}' is not a user id", key)))?;
            if friend_id == user_id {
                return Err(AppError::Validation("A user cannot follow themselves".to_string()));
            }
            Ok(friend_id)
        })
        .collect()
}

async fn ensure_user(db: &Database, user_id: i64) -> AppResult<()> {
    if User::exists(db, user_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("User with id {} not found", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, UserUpdate};

    async fn create_user(db: &Database, username: &str) -> User {
        User::create(
            db,
            NewUser {
                username: username.to_string(),
                display_name: Some(username.to_uppercase()),
                bio: Some(format!("{}'s bio", username)),
                pfp: Some(format!("https://img.example/{}.png", username)),
                interests: vec!["music".to_string()],
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_add_then_remove_restores_follows_ids() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;
        let b = create_user(&db, "b").await;
        let c = create_user(&db, "c").await;

        add_friend(&db, a.id, c.id).await.unwrap();
        let before = follows_ids(&db, a.id).await.unwrap();

        let after_add = add_friend(&db, a.id, b.id).await.unwrap();
        assert_eq!(after_add.get(&b.id.to_string()), Some(&true));

        let after_remove = remove_friend(&db, a.id, b.id).await.unwrap();
        assert_eq!(after_remove, before);
    }

    #[tokio::test]
    async fn test_add_friend_is_idempotent_and_directed() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;
        let b = create_user(&db, "b").await;

        let first = add_friend(&db, a.id, b.id).await.unwrap();
        let second = add_friend(&db, a.id, b.id).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);

        // no edge written on the friend's row
        assert!(follows_ids(&db, b.id).await.unwrap().is_empty());
        let followers = get_followers(&db, b.id).await.unwrap();
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, a.id);
    }

    #[tokio::test]
    async fn test_remove_absent_friend_is_noop() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;

        let follows = remove_friend(&db, a.id, 12345).await.unwrap();
        assert!(follows.is_empty());
    }

    #[tokio::test]
    async fn test_get_friends_returns_public_profiles() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;
        let b = create_user(&db, "b").await;

        add_friend(&db, a.id, b.id).await.unwrap();
        let friends = get_friends(&db, a.id).await.unwrap();

        assert_eq!(friends, vec![PublicProfile::from(&b)]);
        assert!(get_friends(&db, b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_friend_rejects_self_and_unknown_users() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;

        assert!(matches!(add_friend(&db, a.id, a.id).await, Err(AppError::BadRequest(_))));
        assert!(matches!(add_friend(&db, a.id, 999).await, Err(AppError::NotFound(_))));
        assert!(matches!(add_friend(&db, 999, a.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(get_friends(&db, 999).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_keep_every_edge() {
        let (_dir, db) = Database::temp_file(5).await;
        let a = create_user(&db, "a").await;
        let mut friends = Vec::new();
        for i in 0..12 {
            friends.push(create_user(&db, &format!("friend{}", i)).await);
        }

        // every friend twice, so repeated adds race each other too
        let adds = friends.iter().chain(friends.iter()).map(|friend| {
            let db = db.clone();
            let (user_id, friend_id) = (a.id, friend.id);
            tokio::spawn(async move { add_friend(&db, user_id, friend_id).await })
        });
        for joined in futures::future::join_all(adds).await {
            joined.unwrap().unwrap();
        }

        let follows = follows_ids(&db, a.id).await.unwrap();
        assert_eq!(follows.len(), friends.len());
        assert!(friends.iter().all(|f| follows.get(&f.id.to_string()) == Some(&true)));
    }

    #[tokio::test]
    async fn test_profile_update_replaces_friend_set() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;
        let b = create_user(&db, "b").await;
        let c = create_user(&db, "c").await;
        add_friend(&db, a.id, b.id).await.unwrap();

        let follows = FollowsIds::from([(c.id.to_string(), true), (b.id.to_string(), false)]);
        let updated = User::update(
            &db,
            a.id,
            UserUpdate {
                follows_ids: Some(follows),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.follows_ids, FollowsIds::from([(c.id.to_string(), true)]));
    }

    #[tokio::test]
    async fn test_profile_update_rejects_bad_follows_keys() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;
        let b = create_user(&db, "b").await;
        add_friend(&db, a.id, b.id).await.unwrap();

        let result = User::update(
            &db,
            a.id,
            UserUpdate {
                follows_ids: Some(FollowsIds::from([("not-an-id".to_string(), true)])),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        // rejected edit leaves the stored set alone
        assert_eq!(follows_ids(&db, a.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_user_drops_their_edges() {
        let db = Database::in_memory().await.unwrap();
        let a = create_user(&db, "a").await;
        let b = create_user(&db, "b").await;
        add_friend(&db, a.id, b.id).await.unwrap();

        assert!(User::delete(&db, b.id).await.unwrap());
        assert!(follows_ids(&db, a.id).await.unwrap().is_empty());
    }
}
