/// Public timeline endpoint
///
/// Lists posts in reverse chronological order. The timeline is public:
/// no credentials are required to browse it.
///
/// # Endpoint
///
/// `GET /v1/posts?limit=50&offset=0`
///
/// # Example Response
///
/// ```json
/// {
///   "posts": [
///     {
///       "post_id": "550e8400-e29b-41d4-a716-446655440000",
///       "user_id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
///       "title": "Morning sketch",
///       "caption": "Quick warmup",
///       "image_url": "/uploads/4f2a9c...e1.png",
///       "thumbnail_url": "/uploads/thumbs/4f2a9c...e1.png",
///       "created_at": "2026-03-10T12:00:00Z"
///     }
///   ],
///   "total": 128,
///   "limit": 50,
///   "offset": 0
/// }
/// ```

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use easel_shared::models::post::Post;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Page size used when the query does not specify one
const DEFAULT_LIMIT: i64 = 50;

/// Timeline query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineQuery {
    /// Maximum number of posts to return (default 50)
    pub limit: Option<i64>,

    /// Number of posts to skip from the newest end
    pub offset: Option<i64>,
}

/// One post as rendered in timeline and search responses
///
/// The image URLs are relative paths served by the static `/uploads`
/// route, so clients can use them as-is against the same host.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineItem {
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
}

impl From<Post> for TimelineItem {
    fn from(post: Post) -> Self {
        let image_url = format!("/uploads/{}", post.filename);
        let thumbnail_url = format!("/uploads/thumbs/{}", post.filename);

        Self {
            post_id: post.id,
            user_id: post.user_id,
            title: post.title,
            caption: post.caption,
            image_url,
            thumbnail_url,
            created_at: post.created_at,
        }
    }
}

/// Timeline response
#[derive(Debug, Clone, Serialize)]
pub struct TimelineResponse {
    /// Posts, newest first
    pub posts: Vec<TimelineItem>,

    /// Total number of posts across all pages
    pub total: i64,

    /// Limit the page was built with
    pub limit: i64,

    /// Offset the page was built with
    pub offset: i64,
}

/// Timeline endpoint handler
///
/// Returns one page of the public timeline plus the total post count,
/// so clients can render pagination without a second request.
///
/// # Errors
///
/// - 500 Internal Server Error: Database error
pub async fn timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelineResponse>, ApiError> {
    // Negative values would be rejected by Postgres; clamp them instead
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(0);
    let offset = query.offset.unwrap_or(0).max(0);

    let posts = Post::list(&state.db, limit, offset).await?;
    let total = Post::count(&state.db).await?;

    Ok(Json(TimelineResponse {
        posts: posts.into_iter().map(TimelineItem::from).collect(),
        total,
        limit,
        offset,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timeline_query_defaults() {
        let query: TimelineQuery = serde_json::from_value(json!({})).unwrap();
        assert!(query.limit.is_none());
        assert!(query.offset.is_none());

        let query: TimelineQuery =
            serde_json::from_value(json!({"limit": 10, "offset": 20})).unwrap();
        assert_eq!(query.limit, Some(10));
        assert_eq!(query.offset, Some(20));
    }

    #[test]
    fn test_timeline_item_builds_upload_urls() {
        let post = Post {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Morning sketch".to_string(),
            caption: String::new(),
            filename: "4f2a9cder34.png".to_string(),
            created_at: Utc::now(),
        };

        let item = TimelineItem::from(post.clone());
        assert_eq!(item.post_id, post.id);
        assert_eq!(item.image_url, "/uploads/4f2a9cder34.png");
        assert_eq!(item.thumbnail_url, "/uploads/thumbs/4f2a9cder34.png");
    }

    #[test]
    fn test_timeline_response_serialization() {
        let response = TimelineResponse {
            posts: vec![],
            total: 0,
            limit: 50,
            offset: 0,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["total"], 0);
        assert_eq!(value["limit"], 50);
        assert!(value["posts"].as_array().unwrap().is_empty());
    }
}
