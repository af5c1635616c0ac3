// Domain models - row types returned by the API and the request bodies that create or edit them

pub mod conversation;
pub mod group;
pub mod post;
pub mod user;

pub use conversation::{Conversation, ConversationSummary, Message};
pub use group::{Group, GroupUpdate, NewGroup};
pub use post::{FeedPost, NewPost, Post, PostUpdate};
pub use user::{FollowsIds, NewUser, PublicProfile, User, UserUpdate};
