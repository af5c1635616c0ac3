// Lexington Links - student social network backend

// HTTP routers and handlers
pub mod api;
pub mod app_state;
pub mod config;

// Core types and primitives
pub mod core;

// Store: schema, pool, and entity loaders
pub mod database;
pub mod entities;
pub mod models;

// Friends graph and direct messaging
pub mod domains;

// Per-request context
pub mod middleware;

// Common utilities
pub mod data_seeder;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
