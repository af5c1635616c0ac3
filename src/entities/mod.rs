// Entities - row loaders and writers, one module per table family

pub mod ent_conversation;
pub mod ent_group;
pub mod ent_post;
pub mod ent_user;
