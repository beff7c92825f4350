/// Illustration post endpoints
///
/// This module provides the endpoints around posts: uploading an
/// illustration, browsing the public timeline, viewing a single post,
/// searching by title, toggling likes, and deleting.
///
/// # Endpoints
///
/// - `GET /v1/posts` - Public timeline, newest first
/// - `POST /v1/posts` - Upload a new illustration (authenticated)
/// - `GET /v1/posts/:id` - Post detail with like count
/// - `GET /v1/search` - Title substring search
/// - `POST /v1/posts/:id/like` - Toggle a like (authenticated)
/// - `DELETE /v1/posts/:id` - Delete a post (owner or moderator)
///
/// # Authentication
///
/// The timeline, detail, and search endpoints are public. Upload, like,
/// and delete require a JWT access token:
///
/// ```text
/// Authorization: Bearer <token>
/// ```

pub mod delete;
pub mod detail;
pub mod like;
pub mod search;
pub mod timeline;
pub mod upload;

// Re-export handlers for convenience
pub use delete::{delete_post, DeletePostResponse};
pub use detail::{post_detail, PostDetailResponse};
pub use like::{toggle_like, LikeResponse};
pub use search::{search, SearchQuery, SearchResponse};
pub use timeline::{timeline, TimelineItem, TimelineQuery, TimelineResponse};
pub use upload::{upload, UploadResponse};
