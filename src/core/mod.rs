// Core types and primitives shared by models and entities

pub mod strong_types;

pub use strong_types::PostAuthor;
