// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition plus every read-only view of articles, categories and comments.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod service;
