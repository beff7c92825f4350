/// Illustration upload endpoint
///
/// Accepts a multipart form with the image bytes and metadata, validates
/// and stores the image, generates a thumbnail, and records the post.
///
/// # Endpoint
///
/// ```text
/// POST /v1/posts
/// Authorization: Bearer <token>
/// Content-Type: multipart/form-data
///
/// title   = "Morning sketch"        (required, non-empty after trimming)
/// caption = "Quick warmup"          (optional)
/// image   = <file>                  (required; png, jpg, jpeg, gif, webp)
/// ```
///
/// # Example Response
///
/// ```json
/// {
///   "post_id": "550e8400-e29b-41d4-a716-446655440000",
///   "title": "Morning sketch",
///   "caption": "Quick warmup",
///   "filename": "4f2a9c...e1.png",
///   "image_url": "/uploads/4f2a9c...e1.png",
///   "thumbnail_url": "/uploads/thumbs/4f2a9c...e1.png",
///   "created_at": "2026-03-10T12:00:00Z"
/// }
/// ```

use crate::app::AppState;
use crate::error::{ApiError, ValidationErrorDetail};
use axum::{
    body::Bytes,
    extract::{
        multipart::{Multipart, MultipartError},
        State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use easel_shared::auth::middleware::AuthContext;
use easel_shared::models::post::{CreatePost, Post};
use serde::Serialize;
use uuid::Uuid;

/// Upload response
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// Created post ID
    pub post_id: Uuid,

    /// Display title (after trimming)
    pub title: String,

    /// Caption (empty string when omitted)
    pub caption: String,

    /// Server-generated stored filename
    pub filename: String,

    /// Path to the full-size image
    pub image_url: String,

    /// Path to the thumbnail
    pub thumbnail_url: String,

    /// Upload timestamp
    pub created_at: DateTime<Utc>,
}

/// Upload endpoint handler
///
/// Reads the multipart form, validates the title and image, stores the
/// image under a server-generated name, and inserts the post row. The
/// thumbnail is generated on a best-effort basis by the image store.
///
/// # Errors
///
/// - 400 Bad Request: Missing image, unsupported type, or undecodable data
/// - 401 Unauthorized: Missing or invalid token
/// - 413 Payload Too Large: Body exceeds the configured upload limit
/// - 422 Unprocessable Entity: Empty title
/// - 500 Internal Server Error: Storage or database error
pub async fn upload(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut title: Option<String> = None;
    let mut caption: Option<String> = None;
    let mut image: Option<(String, Option<String>, Bytes)> = None;

    // Fields arrive in request order; collect them all before validating
    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        // Owned copy; reading the field consumes it
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => {
                title = Some(field.text().await.map_err(map_multipart_error)?);
            }
            "caption" => {
                caption = Some(field.text().await.map_err(map_multipart_error)?);
            }
            "image" => {
                let original_filename = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(|ct| ct.to_string());
                let data = field.bytes().await.map_err(map_multipart_error)?;
                image = Some((original_filename, content_type, data));
            }
            // Unknown fields are ignored rather than rejected
            _ => {}
        }
    }

    let title = validated_title(title)?;
    let caption = caption.unwrap_or_default();

    let (original_filename, content_type, data) = image
        .ok_or_else(|| ApiError::BadRequest("No image file was selected".to_string()))?;

    // Validates extension, declared type, decodability, and dimensions,
    // then writes the re-encoded original and its thumbnail
    let filename = state
        .images
        .save_upload(&original_filename, content_type.as_deref(), &data)?;

    let post = match Post::create(
        &state.db,
        CreatePost {
            user_id: auth.user_id,
            title,
            caption,
            filename: filename.clone(),
        },
    )
    .await
    {
        Ok(post) => post,
        Err(e) => {
            // The row never landed; drop the stored files so the upload
            // directory does not accumulate orphans
            state.images.delete(&filename);
            return Err(e.into());
        }
    };

    tracing::info!(
        post_id = %post.id,
        user_id = %auth.user_id,
        filename = %post.filename,
        "Illustration uploaded"
    );

    Ok(Json(UploadResponse {
        post_id: post.id,
        title: post.title,
        caption: post.caption,
        image_url: format!("/uploads/{}", post.filename),
        thumbnail_url: format!("/uploads/thumbs/{}", post.filename),
        filename: post.filename,
        created_at: post.created_at,
    }))
}

/// Checks that a title was provided and is non-empty after trimming
fn validated_title(raw: Option<String>) -> Result<String, ApiError> {
    let title = raw.map(|t| t.trim().to_string()).unwrap_or_default();

    if title.is_empty() {
        return Err(ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "title".to_string(),
            message: "Title must not be empty".to_string(),
        }]));
    }

    Ok(title)
}

/// Maps multipart read failures to API errors
///
/// Oversize bodies surface here once the body limit cuts the stream off;
/// everything else is a malformed request.
fn map_multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Uploaded image exceeds the size limit".to_string())
    } else {
        ApiError::BadRequest(format!("Invalid multipart request: {}", err))
    }
}
