/// Title search endpoint
///
/// Case-insensitive substring search over post titles, newest first.
/// Public, and shaped like the timeline so clients can reuse rendering.
///
/// # Endpoint
///
/// `GET /v1/search?q=sketch&limit=50&offset=0`
///
/// # Example Response
///
/// ```json
/// {
///   "query": "sketch",
///   "posts": [ ... ],
///   "total": 4,
///   "limit": 50,
///   "offset": 0
/// }
/// ```

use super::timeline::TimelineItem;
use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Query, State},
    Json,
};
use easel_shared::models::post::Post;
use serde::{Deserialize, Serialize};

/// Page size used when the query does not specify one
const DEFAULT_LIMIT: i64 = 50;

/// Search query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// Title substring to match; empty or missing matches every post
    pub q: Option<String>,

    /// Maximum number of posts to return (default 50)
    pub limit: Option<i64>,

    /// Number of matches to skip from the newest end
    pub offset: Option<i64>,
}

/// Search response
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// The query string after trimming, echoed back for display
    pub query: String,

    /// Matching posts, newest first
    pub posts: Vec<TimelineItem>,

    /// Total number of matches across all pages
    pub total: i64,

    /// Limit the page was built with
    pub limit: i64,

    /// Offset the page was built with
    pub offset: i64,
}

/// Search endpoint handler
///
/// The query is trimmed before matching, so surrounding whitespace does
/// not change results. A blank query degenerates to the full timeline.
///
/// # Errors
///
/// - 500 Internal Server Error: Database error
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    let text = query.q.as_deref().unwrap_or("").trim().to_string();
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(0);
    let offset = query.offset.unwrap_or(0).max(0);

    let posts = Post::search_title(&state.db, &text, limit, offset).await?;
    let total = Post::count_search(&state.db, &text).await?;

    Ok(Json(SearchResponse {
        query: text,
        posts: posts.into_iter().map(TimelineItem::from).collect(),
        total,
        limit,
        offset,
    }))
}
