//! # Easel Shared Library
//!
//! This crate contains shared types, utilities, and business logic used across
//! the Easel API server and the thumbnail backfill tool.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing and token utilities
//! - `db`: Connection pool and migrations
//! - `images`: Upload validation, storage, and thumbnailing

pub mod auth;
pub mod db;
pub mod images;
pub mod models;

/// Current version of the Easel shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
