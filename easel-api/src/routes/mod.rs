/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (register, login, refresh)
/// - `posts`: Illustration endpoints (upload, timeline, detail, search, like, delete)

pub mod auth;
pub mod health;
pub mod posts;
