/// Post deletion endpoint
///
/// Removes a post, its likes (via FK cascade), and its stored files.
/// Allowed for the post's owner and for the configured moderator
/// account.
///
/// # Endpoint
///
/// ```text
/// DELETE /v1/posts/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "post_id": "550e8400-e29b-41d4-a716-446655440000",
///   "deleted": true
/// }
/// ```

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use easel_shared::auth::middleware::AuthContext;
use easel_shared::models::post::Post;
use serde::Serialize;
use uuid::Uuid;

/// Post deletion response
#[derive(Debug, Clone, Serialize)]
pub struct DeletePostResponse {
    /// Deleted post ID
    pub post_id: Uuid,

    /// Whether the row was removed
    pub deleted: bool,
}

/// Post deletion endpoint handler
///
/// File removal is best-effort and happens before the row delete, so
/// the filename is still known; a file that is already gone does not
/// block removing the post.
///
/// # Errors
///
/// - 401 Unauthorized: Missing or invalid token
/// - 403 Forbidden: Caller is neither the owner nor the moderator
/// - 404 Not Found: No post with the given ID
/// - 500 Internal Server Error: Database error
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletePostResponse>, ApiError> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let is_owner = post.user_id == auth.user_id;
    let is_moderator = auth.username == state.config.moderation.moderator_username;

    if !is_owner && !is_moderator {
        tracing::warn!(
            post_id = %post.id,
            user_id = %auth.user_id,
            "Rejected delete by non-owner"
        );
        return Err(ApiError::Forbidden(
            "Only the owner or a moderator can delete a post".to_string(),
        ));
    }

    // Image and thumbnail first, then the row
    state.images.delete(&post.filename);
    let deleted = Post::delete(&state.db, post.id).await?;

    tracing::info!(
        post_id = %post.id,
        user_id = %auth.user_id,
        as_moderator = is_moderator && !is_owner,
        "Post deleted"
    );

    Ok(Json(DeletePostResponse {
        post_id: post.id,
        deleted,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialization() {
        let response = DeletePostResponse {
            post_id: Uuid::new_v4(),
            deleted: true,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["deleted"], true);
        assert!(value["post_id"].is_string());
    }
}
