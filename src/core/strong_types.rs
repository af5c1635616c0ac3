// Strong Types - newtypes and enums for values that are easy to mix up on the wire

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Author of a post: either a user id or the `"anonymous"` sentinel.
///
/// On the wire a user author is a plain number (numeric strings are also
/// accepted on input); the store keeps the textual form in a TEXT column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PostAuthor {
    #[default]
    Anonymous,
    User(i64),
}

impl PostAuthor {
    pub const ANONYMOUS: &'static str = "anonymous";

    /// User id of the author, if the post is not anonymous
    pub fn user_id(self) -> Option<i64> {
        match self {
            PostAuthor::Anonymous => None,
            PostAuthor::User(id) => Some(id),
        }
    }

    /// Textual form stored in `posts.user_id`
    pub fn to_column(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PostAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostAuthor::Anonymous => f.write_str(Self::ANONYMOUS),
            PostAuthor::User(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for PostAuthor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(Self::ANONYMOUS) {
            return Ok(PostAuthor::Anonymous);
        }
        s.parse::<i64>()
            .map(PostAuthor::User)
            .map_err(|_| format!("post author must be a user id or \"{}\", got \"{}\"", Self::ANONYMOUS, s))
    }
}

impl From<i64> for PostAuthor {
    fn from(id: i64) -> Self {
        PostAuthor::User(id)
    }
}

impl Serialize for PostAuthor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PostAuthor::Anonymous => serializer.serialize_str(Self::ANONYMOUS),
            PostAuthor::User(id) => serializer.serialize_i64(*id),
        }
    }
}

impl<'de> Deserialize<'de> for PostAuthor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Id(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Id(id) => Ok(PostAuthor::User(id)),
            Raw::Text(text) => text.parse().map_err(de::Error::custom),
        }
    }
}
