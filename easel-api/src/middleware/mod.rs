/// Middleware modules for the API server
///
/// This module contains custom middleware for:
/// - Security headers
/// - Per-IP rate limiting on authentication routes

pub mod rate_limit;
pub mod security;
