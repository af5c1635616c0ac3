use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::PublicProfile;

/// One direct-message thread. The participant pair is stored canonically:
/// `user_id_1 < user_id_2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub user_id_1: i64,
    pub user_id_2: i64,
    pub created_at: DateTime<Utc>,
    pub last_message_at: Option<DateTime<Utc>>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: i64) -> bool {
        self.user_id_1 == user_id || self.user_id_2 == user_id
    }

    /// The participant that is not `user_id`
    pub fn other_participant(&self, user_id: i64) -> i64 {
        if self.user_id_1 == user_id {
            self.user_id_2
        } else {
            self.user_id_1
        }
    }
}

/// Inbox entry: a conversation plus the peer's public profile
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    #[serde(flatten)]
    pub conversation: Conversation,
    #[serde(rename = "otherUser")]
    pub other_user: Option<PublicProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub conversation_id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_other_participant() {
        let conversation = Conversation {
            id: 1,
            user_id_1: 3,
            user_id_2: 7,
            created_at: Utc::now(),
            last_message_at: None,
        };

        assert_eq!(conversation.other_participant(3), 7);
        assert_eq!(conversation.other_participant(7), 3);
        assert!(conversation.has_participant(7));
        assert!(!conversation.has_participant(5));
    }
}
