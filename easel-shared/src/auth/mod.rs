/// Authentication utilities
///
/// This module provides secure authentication primitives for Easel:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and the registration policy
/// - [`jwt`]: JWT token generation and validation
/// - [`middleware`]: Bearer-token extraction and the request auth context
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing, 24 h access / 30 d refresh expiration
/// - **Constant-time Comparison**: All verification uses constant-time operations
///
/// # Example
///
/// ```
/// use easel_shared::auth::password::{hash_password, verify_password};
/// use easel_shared::auth::jwt::{create_token, Claims, TokenType};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // JWT token generation
/// let claims = Claims::new(Uuid::new_v4(), "mika", TokenType::Access);
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
