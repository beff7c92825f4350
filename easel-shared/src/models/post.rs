/// Post model and database operations
///
/// This module provides the Post model representing an uploaded illustration:
/// an image file on disk plus its title, caption, and owner. Posts are the
/// core entity of Easel; the public timeline and search both read from here.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     caption TEXT NOT NULL DEFAULT '',
///     filename TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use easel_shared::models::post::{Post, CreatePost};
/// use easel_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let post = Post::create(&pool, CreatePost {
///     user_id: Uuid::new_v4(),
///     title: "Harbor at dusk".to_string(),
///     caption: "ink and wash".to_string(),
///     filename: "3f2b8c1d9e4a4f6b8a7c5d2e1f0a9b8c.png".to_string(),
/// }).await?;
///
/// // Newest-first page of the timeline
/// let page = Post::list(&pool, 50, 0).await?;
/// println!("{} posts, latest: {}", page.len(), post.title);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Post model representing an uploaded illustration
///
/// `filename` is the server-generated stored name (UUID hex plus extension),
/// never a client-supplied path. The image lives under the upload directory,
/// its thumbnail under `thumbs/` with the same name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Display title, non-empty after trimming
    pub title: String,

    /// Free-form caption, may be empty
    pub caption: String,

    /// Stored image filename (UUID hex + extension)
    pub filename: String,

    /// When the post was uploaded
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePost {
    /// Owning user (must exist)
    pub user_id: Uuid,

    /// Display title
    pub title: String,

    /// Caption; empty string when the uploader gave none
    pub caption: String,

    /// Stored image filename
    pub filename: String,
}

impl Post {
    /// Creates a new post in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Post creation data
    ///
    /// # Returns
    ///
    /// The newly created post with generated ID and timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `user_id` does not reference an existing user (FK violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreatePost) -> Result<Self, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, title, caption, filename)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, caption, filename, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.caption)
        .bind(data.filename)
        .fetch_one(pool)
        .await?;

        Ok(post)
    }

    /// Finds a post by ID
    ///
    /// # Returns
    ///
    /// The post if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, title, caption, filename, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Lists posts for the public timeline, newest first
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `limit` - Maximum number of posts to return
    /// * `offset` - Number of posts to skip (for pagination)
    ///
    /// # Returns
    ///
    /// Vector of posts ordered by upload time (newest first)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Self>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, title, caption, filename, created_at
            FROM posts
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Counts total number of posts
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Searches posts whose title contains the given substring, newest first
    ///
    /// Matching is case-insensitive (`ILIKE`). The query string is used as a
    /// plain substring; an empty query matches every post.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `query` - Substring to look for in titles
    /// * `limit` - Maximum number of posts to return
    /// * `offset` - Number of posts to skip (for pagination)
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn search_title(
        pool: &PgPool,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", query);

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, title, caption, filename, created_at
            FROM posts
            WHERE title ILIKE $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Counts posts whose title contains the given substring
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count_search(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
        let pattern = format!("%{}%", query);

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE title ILIKE $1")
            .bind(pattern)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes a post by ID
    ///
    /// Likes on the post are removed by the FK cascade. The stored image and
    /// thumbnail are the caller's responsibility; remove them before the row
    /// so the filename is still known.
    ///
    /// # Returns
    ///
    /// True if the post was deleted, false if it didn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
