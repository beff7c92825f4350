/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use easel_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = easel_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{rate_limit::RateLimiter, security::SecurityHeadersLayer},
};
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use easel_shared::{auth::middleware as auth, images::store::ImageStore};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Filesystem store for uploaded images and thumbnails
    pub images: ImageStore,

    /// Per-IP limiter guarding the authentication endpoints
    pub auth_limiter: Arc<RateLimiter>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The image store and rate limiter are derived from the configuration,
    /// so handlers never re-read environment values at request time.
    pub fn new(db: PgPool, config: Config) -> Self {
        let images = ImageStore::new(
            config.upload.dir.clone(),
            config.upload.max_dimension,
            config.upload.thumbnail_size,
        );
        let auth_limiter = Arc::new(RateLimiter::per_minute(config.rate_limit.auth_per_minute));

        Self {
            db,
            config: Arc::new(config),
            images,
            auth_limiter,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// ├── /uploads/                 # Stored images and thumbnails (public, static)
/// ├── /v1/                      # API v1 (versioned)
/// │   ├── /auth/                # Authentication endpoints (rate limited)
/// │   │   ├── POST /register
/// │   │   ├── POST /login
/// │   │   └── POST /refresh
/// │   ├── /posts/               # Illustration posts
/// │   │   ├── GET    /          # Timeline, newest first (public)
/// │   │   ├── POST   /          # Upload a new post (authenticated)
/// │   │   ├── GET    /:id       # Post detail (public)
/// │   │   ├── POST   /:id/like  # Toggle like (authenticated)
/// │   │   └── DELETE /:id       # Delete post (owner or moderator)
/// │   └── GET /search           # Title substring search (public)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Authentication and rate limiting (per-route basis)
///
/// # Example
///
/// ```no_run
/// use easel_api::app::{AppState, build_router};
/// use sqlx::PgPool;
/// use easel_api::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
///
/// let app = build_router(state);
///
/// // Start server
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_router(state: AppState) -> Router {
    // Import route handlers
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, but rate limited per client IP)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::rate_limit::rate_limit_layer,
        ));

    // Read-only post routes (public, no auth)
    let public_post_routes = Router::new()
        .route("/posts", get(routes::posts::timeline))
        .route("/posts/:id", get(routes::posts::post_detail))
        .route("/search", get(routes::posts::search));

    // Mutating post routes (require JWT authentication). The body limit
    // covers the multipart upload; the other routes carry no body.
    let protected_post_routes = Router::new()
        .route("/posts", post(routes::posts::upload))
        .route("/posts/:id/like", post(routes::posts::toggle_like))
        .route("/posts/:id", delete(routes::posts::delete_post))
        .layer(DefaultBodyLimit::max(state.config.upload.max_bytes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(public_post_routes)
        .merge(protected_post_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .nest_service("/uploads", ServeDir::new(&state.config.upload.dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token from the Authorization header,
/// then injects AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_context = auth::authenticate(req.headers(), state.jwt_secret())?;

    // Insert into request extensions
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
