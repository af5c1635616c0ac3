// Domain logic that spans more than one entity

pub mod friends;
pub mod messaging;
