/// Database models for Easel
///
/// This module contains all database models and their query operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `post`: Uploaded illustrations (timeline and search read from here)
/// - `like`: User-post like pairs
///
/// # Example
///
/// ```no_run
/// use easel_shared::models::user::{User, CreateUser};
/// use easel_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "mika".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod like;
pub mod post;
pub mod user;
