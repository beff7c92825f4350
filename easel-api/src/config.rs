/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_PRODUCTION`: Enables HSTS and strict CORS (default: false)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `JWT_SECRET`: Secret key for JWT signing (required, at least 32 chars)
/// - `UPLOAD_DIR`: Directory for uploaded images (default: data/uploads)
/// - `UPLOAD_MAX_BYTES`: Request body cap for uploads (default: 5242880)
/// - `IMAGE_MAX_DIMENSION`: Max accepted width/height (default: 4000)
/// - `THUMBNAIL_SIZE`: Thumbnail bounding box edge (default: 300)
/// - `MODERATOR_USERNAME`: Account allowed to delete any post (default: admin)
/// - `AUTH_RATE_LIMIT_PER_MINUTE`: Per-IP budget on auth routes (default: 10)
/// - `RUST_LOG`: Log level (default: info)
///
/// # Example
///
/// ```no_run
/// use easel_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}:{}", config.api.host, config.api.port);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Upload and image configuration
    pub upload: UploadConfig,

    /// Moderation configuration
    pub moderation: ModerationConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins ("*" means permissive)
    pub cors_origins: Vec<String>,

    /// Whether the server runs behind HTTPS in production
    pub production: bool,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,
}

/// Upload and image processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory where uploaded images are stored
    pub dir: PathBuf,

    /// Maximum upload request body size in bytes
    pub max_bytes: usize,

    /// Maximum accepted image width and height in pixels
    pub max_dimension: u32,

    /// Thumbnail bounding box edge in pixels
    pub thumbnail_size: u32,
}

/// Moderation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Username whose account may delete any post
    pub moderator_username: String,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per minute allowed per client IP on auth routes
    pub auth_per_minute: u32,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let api_port = env::var("API_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()?;

        let production = env::var("API_PRODUCTION")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()?;

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/uploads".to_string());

        let upload_max_bytes = env::var("UPLOAD_MAX_BYTES")
            .unwrap_or_else(|_| "5242880".to_string())
            .parse::<usize>()?;

        let max_dimension = env::var("IMAGE_MAX_DIMENSION")
            .unwrap_or_else(|_| "4000".to_string())
            .parse::<u32>()?;

        let thumbnail_size = env::var("THUMBNAIL_SIZE")
            .unwrap_or_else(|_| "300".to_string())
            .parse::<u32>()?;

        let moderator_username =
            env::var("MODERATOR_USERNAME").unwrap_or_else(|_| "admin".to_string());

        let auth_per_minute = env::var("AUTH_RATE_LIMIT_PER_MINUTE")
            .unwrap_or_else(|_| "10".to_string())
            .parse::<u32>()?;

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret: jwt_secret,
            },
            upload: UploadConfig {
                dir: PathBuf::from(upload_dir),
                max_bytes: upload_max_bytes,
                max_dimension,
                thumbnail_size,
            },
            moderation: ModerationConfig { moderator_username },
            rate_limit: RateLimitConfig { auth_per_minute },
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 10,
            },
            jwt: JwtConfig {
                secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            },
            upload: UploadConfig {
                dir: PathBuf::from("data/uploads"),
                max_bytes: 5 * 1024 * 1024,
                max_dimension: 4000,
                thumbnail_size: 300,
            },
            moderation: ModerationConfig {
                moderator_username: "admin".to_string(),
            },
            rate_limit: RateLimitConfig {
                auth_per_minute: 10,
            },
        }
    }

    #[test]
    fn test_bind_address() {
        let config = sample_config();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_config_is_cloneable() {
        let config = sample_config();
        let cloned = config.clone();
        assert_eq!(cloned.upload.max_bytes, 5 * 1024 * 1024);
        assert_eq!(cloned.moderation.moderator_username, "admin");
    }
}
