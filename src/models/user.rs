use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

/// Presence map of friended user ids, keyed by the id's decimal string
pub type FollowsIds = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub pfp: Option<String>,
    pub interests: Vec<String>,
    pub follows_ids: FollowsIds,
    pub created_at: DateTime<Utc>,
}

/// Fields of a user that other users get to see in friend lists, post
/// bylines and conversation headers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: i64,
    pub username: String,
    pub pfp: Option<String>,
    pub interests: Vec<String>,
}

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            pfp: user.pfp.clone(),
            interests: user.interests.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub pfp: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
}

impl NewUser {
    pub fn validate(&self) -> AppResult<()> {
        validate_username(&self.username)
    }
}

/// Partial profile edit. Absent fields keep their stored value, an explicit
/// `null` clears a nullable field, and a present `follows_ids` replaces the
/// whole friend set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub display_name: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub pfp: Option<Option<String>>,
    pub interests: Option<Vec<String>>,
    pub follows_ids: Option<FollowsIds>,
}

impl UserUpdate {
    pub fn validate(&self) -> AppResult<()> {
        match &self.username {
            Some(username) => validate_username(username),
            None => Ok(()),
        }
    }
}

fn validate_username(username: &str) -> AppResult<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("username is required".to_string()));
    }
    if username.trim() != username {
        return Err(AppError::Validation(
            "username must not start or end with whitespace".to_string(),
        ));
    }
    Ok(())
}
