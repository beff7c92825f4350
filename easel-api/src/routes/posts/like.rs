/// Like toggle endpoint
///
/// One call likes the post, the next call unlikes it. A user holds at
/// most one like per post, enforced by the composite primary key.
///
/// # Endpoint
///
/// ```text
/// POST /v1/posts/:id/like
/// Authorization: Bearer <token>
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "post_id": "550e8400-e29b-41d4-a716-446655440000",
///   "liked": true,
///   "like_count": 4
/// }
/// ```

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use easel_shared::auth::middleware::AuthContext;
use easel_shared::models::{like::Like, post::Post};
use serde::Serialize;
use uuid::Uuid;

/// Like toggle response
#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    /// Post the toggle applied to
    pub post_id: Uuid,

    /// Whether the caller likes the post after this call
    pub liked: bool,

    /// Like count after this call
    pub like_count: i64,
}

/// Like toggle endpoint handler
///
/// The insert is attempted first; if the like already existed the
/// insert is a no-op and the row is deleted instead, so two racing
/// toggles cannot double-count.
///
/// # Errors
///
/// - 401 Unauthorized: Missing or invalid token
/// - 404 Not Found: No post with the given ID
/// - 500 Internal Server Error: Database error
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<LikeResponse>, ApiError> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let liked = if Like::create(&state.db, auth.user_id, post.id).await? {
        true
    } else {
        Like::delete(&state.db, auth.user_id, post.id).await?;
        false
    };

    let like_count = Like::count_for_post(&state.db, post.id).await?;

    tracing::debug!(
        post_id = %post.id,
        user_id = %auth.user_id,
        liked,
        "Like toggled"
    );

    Ok(Json(LikeResponse {
        post_id: post.id,
        liked,
        like_count,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_response_serialization() {
        let response = LikeResponse {
            post_id: Uuid::new_v4(),
            liked: true,
            like_count: 4,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["liked"], true);
        assert_eq!(value["like_count"], 4);
    }
}
