use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::PublicProfile;
use crate::core::PostAuthor;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user_id: PostAuthor,
    pub caption: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A post as the feed renders it, with the author's public profile attached.
/// `user` is omitted for anonymous posts and for authors that no longer exist.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPost {
    #[serde(flatten)]
    pub post: Post,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub user_id: PostAuthor,
    pub caption: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "photo_url")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub caption: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub content: Option<Option<String>>,
    #[serde(default, alias = "photo_url", with = "::serde_with::rust::double_option")]
    pub image_url: Option<Option<String>>,
}
