/// Post detail endpoint
///
/// Returns a single post with its like count. Public, like the timeline.
///
/// # Endpoint
///
/// `GET /v1/posts/:id`
///
/// # Example Response
///
/// ```json
/// {
///   "post_id": "550e8400-e29b-41d4-a716-446655440000",
///   "user_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
///   "title": "Morning sketch",
///   "caption": "Quick warmup",
///   "image_url": "/uploads/4f2a9c...e1.png",
///   "thumbnail_url": "/uploads/thumbs/4f2a9c...e1.png",
///   "created_at": "2026-03-10T12:00:00Z",
///   "like_count": 3
/// }
/// ```

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use easel_shared::models::{like::Like, post::Post};
use serde::Serialize;
use uuid::Uuid;

/// Post detail response
#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    /// Post ID
    pub post_id: Uuid,

    /// Owning user ID
    pub user_id: Uuid,

    /// Display title
    pub title: String,

    /// Free-form caption (may be empty)
    pub caption: String,

    /// Path to the full-size image
    pub image_url: String,

    /// Path to the thumbnail
    pub thumbnail_url: String,

    /// Upload timestamp
    pub created_at: DateTime<Utc>,

    /// Number of likes on the post
    pub like_count: i64,
}

/// Post detail endpoint handler
///
/// # Errors
///
/// - 404 Not Found: No post with the given ID
/// - 500 Internal Server Error: Database error
pub async fn post_detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = Post::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    let like_count = Like::count_for_post(&state.db, post.id).await?;

    Ok(Json(PostDetailResponse {
        post_id: post.id,
        user_id: post.user_id,
        title: post.title,
        caption: post.caption,
        image_url: format!("/uploads/{}", post.filename),
        thumbnail_url: format!("/uploads/thumbs/{}", post.filename),
        created_at: post.created_at,
        like_count,
    }))
}
