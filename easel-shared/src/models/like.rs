/// Like model and database operations
///
/// This module provides the Like model recording which users have liked which
/// posts. It is a plain junction table; the composite primary key guarantees
/// at most one like per (user, post) pair, which makes the like action a
/// toggle: inserting when absent, deleting when present.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE likes (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, post_id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use easel_shared::models::like::Like;
/// use easel_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(user_id: Uuid, post_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Toggle: insert wins when the pair is new, otherwise remove it
/// let liked = if Like::create(&pool, user_id, post_id).await? {
///     true
/// } else {
///     Like::delete(&pool, user_id, post_id).await?;
///     false
/// };
///
/// let count = Like::count_for_post(&pool, post_id).await?;
/// println!("liked={} total={}", liked, count);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Like model representing one user's like on one post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
    /// User who liked the post
    pub user_id: Uuid,

    /// Liked post
    pub post_id: Uuid,

    /// When the like was recorded
    pub created_at: DateTime<Utc>,
}

impl Like {
    /// Records a like, doing nothing if the pair already exists
    ///
    /// Uses `ON CONFLICT DO NOTHING` so the primary key is the arbiter
    /// under concurrent requests.
    ///
    /// # Returns
    ///
    /// True if a new like was inserted, false if the user had already
    /// liked the post
    ///
    /// # Errors
    ///
    /// Returns an error if the post or user does not exist (FK violation)
    /// or the database connection fails
    pub async fn create(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO likes (user_id, post_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes a like
    ///
    /// # Returns
    ///
    /// True if a like was removed, false if none existed
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn delete(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Checks whether a user has liked a post
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn exists(pool: &PgPool, user_id: Uuid, post_id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM likes
                WHERE user_id = $1 AND post_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Counts likes on a post
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    pub async fn count_for_post(pool: &PgPool, post_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM likes WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_serializes() {
        let like = Like {
            user_id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&like).unwrap();
        assert!(json["user_id"].is_string());
        assert!(json["post_id"].is_string());
    }

    // Integration tests for database operations live in easel-api/tests.
}
