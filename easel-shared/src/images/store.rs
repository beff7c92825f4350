/// Upload validation and storage for illustration images
///
/// Uploaded files pass four checks before anything touches disk: the client
/// filename must carry an allowed extension, the declared content type must
/// be `image/*`, the bytes must decode as a real image, and the decoded
/// dimensions must fit within the configured limit. Accepted images are
/// re-encoded to RGB and written under a server-generated name, so client
/// bytes and client filenames never reach the filesystem as-is.
///
/// # Layout
///
/// ```text
/// {root}/                  originals, named {uuid-hex}.{ext}
/// {root}/thumbs/           thumbnails, same filename as the original
/// ```
///
/// # Example
///
/// ```no_run
/// use easel_shared::images::store::ImageStore;
///
/// # fn example(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
/// let store = ImageStore::new("data/uploads", 4000, 300);
/// store.initialize()?;
///
/// let filename = store.save_upload("drawing.png", Some("image/png"), bytes)?;
/// println!("Stored as {}", filename);
/// # Ok(())
/// # }
/// ```

use std::fs;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::images::thumbnails::{self, THUMBS_SUBDIR};

/// File extensions accepted for upload, lowercase
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "webp"];

/// Error type for image validation and storage
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// Upload carried no filename
    #[error("No image file was selected")]
    MissingFilename,

    /// Filename extension is not in the allowed set
    #[error("Unsupported file extension (allowed: png, jpg, jpeg, gif, webp)")]
    UnsupportedExtension,

    /// Declared content type is not an image type
    #[error("Uploaded file is not an image")]
    UnsupportedContentType,

    /// Bytes did not decode as an image, or re-encoding failed
    #[error("Invalid or corrupt image data")]
    InvalidImage(#[source] image::ImageError),

    /// Decoded image exceeds the configured dimension limit
    #[error("Image dimensions {width}x{height} exceed the {max}x{max} limit")]
    DimensionsExceeded { width: u32, height: u32, max: u32 },

    /// Filesystem operation failed
    #[error("Image storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Returns the normalized (lowercase) extension when the filename carries
/// one of the allowed extensions
///
/// The extension is the part after the last dot. Filenames without a dot
/// are rejected.
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Some(ext)
    } else {
        None
    }
}

/// Filesystem store for uploaded illustrations and their thumbnails
#[derive(Debug, Clone)]
pub struct ImageStore {
    /// Directory holding the original images
    root: PathBuf,

    /// Maximum accepted width and height in pixels
    max_dimension: u32,

    /// Thumbnail bounding box edge in pixels
    thumbnail_size: u32,
}

impl ImageStore {
    /// Creates a store rooted at the given directory
    ///
    /// Call [`initialize`](Self::initialize) before the first write.
    pub fn new(root: impl Into<PathBuf>, max_dimension: u32, thumbnail_size: u32) -> Self {
        Self {
            root: root.into(),
            max_dimension,
            thumbnail_size,
        }
    }

    /// Directory holding the original images
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the thumbnails
    pub fn thumbs_dir(&self) -> PathBuf {
        self.root.join(THUMBS_SUBDIR)
    }

    /// Path of a stored original
    pub fn original_path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Path of a stored thumbnail
    pub fn thumbnail_path(&self, filename: &str) -> PathBuf {
        self.thumbs_dir().join(filename)
    }

    /// Creates the upload and thumbnail directories if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn initialize(&self) -> Result<(), ImageError> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.thumbs_dir())?;
        debug!(root = %self.root.display(), "Image store initialized");
        Ok(())
    }

    /// Validates an upload and writes the image and its thumbnail to disk
    ///
    /// Returns the server-generated filename (`{uuid-hex}.{ext}`) that the
    /// caller should persist. The image is decoded, checked against the
    /// dimension limit, and re-encoded as RGB before being written, so the
    /// stored file never contains the client's original bytes. Thumbnail
    /// generation failures are logged and ignored; the original is already
    /// on disk at that point.
    ///
    /// # Arguments
    ///
    /// * `original_filename` - Filename as sent by the client, used only for
    ///   its extension
    /// * `content_type` - Declared MIME type of the upload, if any
    /// * `bytes` - Raw upload body
    ///
    /// # Errors
    ///
    /// Returns an error if the filename, content type, image data, or
    /// dimensions fail validation, or if the original cannot be written.
    pub fn save_upload(
        &self,
        original_filename: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, ImageError> {
        if original_filename.trim().is_empty() {
            return Err(ImageError::MissingFilename);
        }

        let ext = allowed_extension(original_filename).ok_or(ImageError::UnsupportedExtension)?;

        match content_type {
            Some(mime) if mime.starts_with("image/") => {}
            _ => return Err(ImageError::UnsupportedContentType),
        }

        // Format is sniffed from the bytes, not trusted from the extension
        let decoded = image::load_from_memory(bytes).map_err(ImageError::InvalidImage)?;

        let (width, height) = (decoded.width(), decoded.height());
        if width > self.max_dimension || height > self.max_dimension {
            return Err(ImageError::DimensionsExceeded {
                width,
                height,
                max: self.max_dimension,
            });
        }

        let filename = format!("{}.{}", Uuid::new_v4().simple(), ext);
        let path = self.original_path(&filename);

        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
        rgb.save(&path).map_err(ImageError::InvalidImage)?;

        debug!(
            filename = %filename,
            width = width,
            height = height,
            "Stored uploaded image"
        );

        if let Err(e) = thumbnails::write_thumbnail(
            &decoded,
            &self.thumbnail_path(&filename),
            self.thumbnail_size,
        ) {
            warn!(
                filename = %filename,
                error = %e,
                "Thumbnail generation failed, keeping original"
            );
        }

        Ok(filename)
    }

    /// Removes a stored image and its thumbnail, best effort
    ///
    /// Missing files are not an error; other removal failures are logged
    /// and swallowed so a post delete never fails on filesystem state.
    pub fn delete(&self, filename: &str) {
        for path in [self.original_path(filename), self.thumbnail_path(filename)] {
            if let Err(e) = fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to remove image file"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([120, 40, 200]));
        let mut buf = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, image::ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn test_store(root: &Path) -> ImageStore {
        let store = ImageStore::new(root, 4000, 300);
        store.initialize().unwrap();
        store
    }

    #[test]
    fn test_allowed_extension_accepts_known_types() {
        assert_eq!(allowed_extension("a.png"), Some("png".to_string()));
        assert_eq!(allowed_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(allowed_extension("scan.jpeg"), Some("jpeg".to_string()));
        assert_eq!(allowed_extension("anim.gif"), Some("gif".to_string()));
        assert_eq!(allowed_extension("art.WebP"), Some("webp".to_string()));
        // Only the last extension counts
        assert_eq!(allowed_extension("a.tar.png"), Some("png".to_string()));
    }

    #[test]
    fn test_allowed_extension_rejects_unknown() {
        assert_eq!(allowed_extension("malware.exe"), None);
        assert_eq!(allowed_extension("noextension"), None);
        assert_eq!(allowed_extension("trailingdot."), None);
        assert_eq!(allowed_extension("archive.png.zip"), None);
        assert_eq!(allowed_extension(""), None);
    }

    #[test]
    fn test_save_upload_stores_original_and_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let filename = store
            .save_upload("drawing.PNG", Some("image/png"), &png_bytes(8, 8))
            .unwrap();

        // Server-generated name: 32 hex chars plus the normalized extension
        assert!(filename.ends_with(".png"));
        assert_eq!(filename.len(), 32 + ".png".len());
        assert_ne!(filename, "drawing.PNG");

        assert!(store.original_path(&filename).exists());
        assert!(store.thumbnail_path(&filename).exists());
    }

    #[test]
    fn test_save_upload_rejects_missing_filename() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let result = store.save_upload("", Some("image/png"), &png_bytes(4, 4));
        assert!(matches!(result, Err(ImageError::MissingFilename)));

        let result = store.save_upload("   ", Some("image/png"), &png_bytes(4, 4));
        assert!(matches!(result, Err(ImageError::MissingFilename)));
    }

    #[test]
    fn test_save_upload_rejects_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let result = store.save_upload("cat.exe", Some("image/png"), &png_bytes(4, 4));
        assert!(matches!(result, Err(ImageError::UnsupportedExtension)));
    }

    #[test]
    fn test_save_upload_rejects_non_image_content_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let result = store.save_upload("cat.png", Some("text/plain"), &png_bytes(4, 4));
        assert!(matches!(result, Err(ImageError::UnsupportedContentType)));

        let result = store.save_upload("cat.png", None, &png_bytes(4, 4));
        assert!(matches!(result, Err(ImageError::UnsupportedContentType)));
    }

    #[test]
    fn test_save_upload_rejects_corrupt_data() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let result = store.save_upload("cat.png", Some("image/png"), b"not an image at all");
        assert!(matches!(result, Err(ImageError::InvalidImage(_))));
    }

    #[test]
    fn test_save_upload_rejects_oversized_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path(), 8, 300);
        store.initialize().unwrap();

        let result = store.save_upload("big.png", Some("image/png"), &png_bytes(9, 4));
        match result {
            Err(ImageError::DimensionsExceeded { width, height, max }) => {
                assert_eq!(width, 9);
                assert_eq!(height, 4);
                assert_eq!(max, 8);
            }
            other => panic!("Expected DimensionsExceeded, got {:?}", other),
        }

        // Exactly at the limit is allowed
        let result = store.save_upload("fits.png", Some("image/png"), &png_bytes(8, 8));
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_upload_reencodes_to_extension_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        // PNG bytes uploaded under a .jpg name get re-encoded as JPEG
        let filename = store
            .save_upload("photo.jpg", Some("image/png"), &png_bytes(6, 6))
            .unwrap();
        assert!(filename.ends_with(".jpg"));

        let format = image::ImageReader::open(store.original_path(&filename))
            .unwrap()
            .with_guessed_format()
            .unwrap()
            .format();
        assert_eq!(format, Some(image::ImageFormat::Jpeg));
    }

    #[test]
    fn test_delete_removes_files_and_ignores_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = test_store(dir.path());

        let filename = store
            .save_upload("art.png", Some("image/png"), &png_bytes(4, 4))
            .unwrap();
        assert!(store.original_path(&filename).exists());

        store.delete(&filename);
        assert!(!store.original_path(&filename).exists());
        assert!(!store.thumbnail_path(&filename).exists());

        // Deleting again is a no-op
        store.delete(&filename);
        store.delete("never-existed.png");
    }
}
