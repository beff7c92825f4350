/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test configuration with a throwaway upload directory
/// - An app instance backed by either a lazy pool (no database needed)
///   or a live Postgres connection
/// - Request builders (JSON, bare, multipart) and a test image encoder
/// - Test user registration and cleanup

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use easel_api::app::{build_router, AppState};
use easel_api::config::{
    ApiConfig, Config, DatabaseConfig, JwtConfig, ModerationConfig, RateLimitConfig, UploadConfig,
};
use easel_shared::auth::jwt::{create_token, Claims, TokenType};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::path::Path;
use tempfile::TempDir;
use tower::Service as _;
use uuid::Uuid;

/// Signing secret used by every test app instance
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Password that satisfies the registration policy
pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Multipart boundary used by the request builder
const BOUNDARY: &str = "easel-test-boundary";

/// Test context owning the app under test and its upload directory
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    /// Keeps the temporary upload directory alive for the test's duration
    pub upload_dir: TempDir,
}

/// Builds a configuration pointing at the given upload dir and database
pub fn test_config(upload_dir: &Path, database_url: &str, auth_per_minute: u32) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            production: false,
        },
        database: DatabaseConfig {
            url: database_url.to_string(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        upload: UploadConfig {
            dir: upload_dir.to_path_buf(),
            max_bytes: 5 * 1024 * 1024,
            max_dimension: 4000,
            thumbnail_size: 300,
        },
        moderation: ModerationConfig {
            // Unique per context so live tests can register the account
            moderator_username: format!("mod-{}", Uuid::new_v4().simple()),
        },
        rate_limit: RateLimitConfig { auth_per_minute },
    }
}

impl TestContext {
    /// Creates a context without a reachable database
    ///
    /// The pool is lazy and points at a closed port, so routes that do
    /// not touch Postgres behave normally and the health check degrades.
    pub fn offline() -> Self {
        Self::offline_with(|_| {})
    }

    /// Like [`offline`](Self::offline), with a configuration tweak applied
    pub fn offline_with(tweak: impl FnOnce(&mut Config)) -> Self {
        let upload_dir = TempDir::new().expect("create temp upload dir");
        let mut config = test_config(upload_dir.path(), "postgresql://127.0.0.1:1/easel_test", 100);
        tweak(&mut config);

        let db = PgPool::connect_lazy(&config.database.url).expect("build lazy pool");

        let state = AppState::new(db.clone(), config.clone());
        state.images.initialize().expect("init upload dir");
        let app = build_router(state);

        Self {
            db,
            app,
            config,
            upload_dir,
        }
    }

    /// Creates a context against a live Postgres, or `None` to skip
    ///
    /// Tests call this as `let Some(ctx) = TestContext::with_database().await
    /// else { return };` so they pass trivially where DATABASE_URL is unset.
    pub async fn with_database() -> Option<Self> {
        let url = std::env::var("DATABASE_URL").ok()?;

        let upload_dir = TempDir::new().expect("create temp upload dir");
        let config = test_config(upload_dir.path(), &url, 1000);

        let db = PgPool::connect(&url).await.expect("connect to test database");

        // Path relative to Cargo.toml, not this file
        sqlx::migrate!("../migrations")
            .run(&db)
            .await
            .expect("run migrations");

        let state = AppState::new(db.clone(), config.clone());
        state.images.initialize().expect("init upload dir");
        let app = build_router(state);

        Some(Self {
            db,
            app,
            config,
            upload_dir,
        })
    }

    /// Sends a request and returns the raw response
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request and returns status plus parsed JSON body
    ///
    /// Non-JSON bodies (e.g. served image bytes) come back as `Null`.
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);

        (status, json)
    }

    /// Registers a fresh user through the API, returning ID and access token
    pub async fn register_user(&self, username: &str, password: &str) -> (Uuid, String) {
        let (status, body) = self
            .call(json_request(
                "POST",
                "/v1/auth/register",
                None,
                &json!({ "username": username, "password": password }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "registration failed: {body}");

        let user_id = Uuid::parse_str(body["user_id"].as_str().unwrap()).unwrap();
        let token = body["access_token"].as_str().unwrap().to_string();
        (user_id, token)
    }

    /// Removes a test user; posts and likes follow via FK cascade
    pub async fn delete_user(&self, user_id: Uuid) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .expect("delete test user");
    }
}

/// Builds a GET request with an empty body
pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Builds a bodyless request, optionally with a bearer token
pub fn bare_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Builds a JSON request, optionally with a bearer token
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a multipart upload request
///
/// Any of the three parts can be omitted to exercise validation paths.
/// The image part is `(filename, content type, bytes)`.
pub fn multipart_request(
    uri: &str,
    token: &str,
    title: Option<&str>,
    caption: Option<&str>,
    image: Option<(&str, &str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();

    if let Some(title) = title {
        push_text_part(&mut body, "title", title);
    }
    if let Some(caption) = caption {
        push_text_part(&mut body, "caption", caption);
    }
    if let Some((filename, content_type, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn push_text_part(body: &mut Vec<u8>, name: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
    );
}

/// Encodes a solid-color PNG of the given size
pub fn test_png(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        width,
        height,
        image::Rgb([120, 80, 200]),
    ));

    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode test image");
    bytes.into_inner()
}

/// Mints a valid access token without going through registration
pub fn access_token_for(user_id: Uuid, username: &str, secret: &str) -> String {
    let claims = Claims::new(user_id, username, TokenType::Access);
    create_token(&claims, secret).expect("sign test token")
}

/// Generates a username unique to this test run
pub fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
