/// Authentication context and bearer-token extraction
///
/// This module provides the pieces the API's auth middleware is built from:
/// credential extraction from request headers, token validation, and the
/// `AuthContext` that handlers read back out of request extensions.
///
/// # Request Extensions
///
/// After successful authentication the API middleware inserts an
/// `AuthContext` carrying the authenticated user's ID and username.
///
/// # Example
///
/// ```
/// use axum::http::{header, HeaderMap, HeaderValue};
/// use easel_shared::auth::jwt::{create_token, Claims, TokenType};
/// use easel_shared::auth::middleware::authenticate;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "test-secret-key-at-least-32-bytes-long";
/// let claims = Claims::new(Uuid::new_v4(), "mika", TokenType::Access);
/// let token = create_token(&claims, secret)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_str(&format!("Bearer {}", token))?,
/// );
///
/// let auth = authenticate(&headers, secret)?;
/// assert_eq!(auth.username, "mika");
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, Claims, JwtError};

/// Authentication context added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor. The username is
/// the one the token was issued with; handlers that need current account
/// state load the user row by ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Username at token issue time
    pub username: String,
}

impl AuthContext {
    /// Creates auth context from validated JWT claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username.clone(),
        }
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("{0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("{0}")]
    InvalidToken(String),
}

/// Extracts and validates a bearer token from request headers
///
/// Looks for `Authorization: Bearer <token>`, validates the token as an
/// access token, and returns the authenticated context.
///
/// # Arguments
///
/// * `headers` - Request headers
/// * `secret` - JWT secret for validation
///
/// # Errors
///
/// - `MissingCredentials` when the Authorization header is absent
/// - `InvalidFormat` when the header is not a Bearer token
/// - `InvalidToken` when validation fails (bad signature, expired,
///   wrong issuer, or a refresh token used as an access token)
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    // Extract Authorization header
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    // Parse Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    // Validate token
    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        JwtError::InvalidIssuer { .. } => AuthError::InvalidToken("Invalid issuer".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    Ok(AuthContext::from_claims(&claims))
}
