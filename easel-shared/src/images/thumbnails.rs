/// Thumbnail generation for stored illustrations
///
/// Thumbnails live in a `thumbs/` subdirectory of the upload root, under the
/// same filename as the original. Generation is shrink-only: images already
/// within the bounding box are written unchanged rather than upscaled, and
/// the aspect ratio is always preserved.

use std::path::Path;

use image::DynamicImage;

use crate::images::store::ImageError;

/// Subdirectory of the upload root that holds thumbnails
pub const THUMBS_SUBDIR: &str = "thumbs";

/// Writes a thumbnail of an already decoded image
///
/// The image is scaled down to fit within `size`x`size` when it exceeds the
/// box, converted to RGB, and encoded in the format implied by the
/// destination extension.
///
/// # Errors
///
/// Returns an error if encoding or the filesystem write fails.
pub fn write_thumbnail(image: &DynamicImage, dest: &Path, size: u32) -> Result<(), ImageError> {
    let scaled = if image.width() > size || image.height() > size {
        image.thumbnail(size, size)
    } else {
        image.clone()
    };

    let rgb = DynamicImage::ImageRgb8(scaled.to_rgb8());
    rgb.save(dest).map_err(ImageError::InvalidImage)?;
    Ok(())
}

/// Decodes an image file and writes its thumbnail
///
/// The source format is sniffed from the file contents, not its extension.
/// Used by the batch regeneration tool to rebuild thumbnails for images
/// that are already on disk.
///
/// # Errors
///
/// Returns an error if the source cannot be read or decoded, or if the
/// thumbnail cannot be written.
pub fn generate_for_file(src: &Path, dest: &Path, size: u32) -> Result<(), ImageError> {
    let image = image::ImageReader::open(src)?
        .with_guessed_format()?
        .decode()
        .map_err(ImageError::InvalidImage)?;

    write_thumbnail(&image, dest, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            width,
            height,
            image::Rgb([200, 90, 30]),
        ))
    }

    #[test]
    fn test_write_thumbnail_shrinks_large_images() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("wide.png");

        write_thumbnail(&solid_image(1200, 600), &dest, 300).unwrap();

        let (width, height) = image::image_dimensions(&dest).unwrap();
        assert_eq!((width, height), (300, 150));
    }

    #[test]
    fn test_write_thumbnail_never_upscales() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("small.png");

        write_thumbnail(&solid_image(100, 50), &dest, 300).unwrap();

        let (width, height) = image::image_dimensions(&dest).unwrap();
        assert_eq!((width, height), (100, 50));
    }

    #[test]
    fn test_generate_for_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.png");
        let dest = dir.path().join("thumb.png");

        solid_image(900, 900).save(&src).unwrap();
        generate_for_file(&src, &dest, 300).unwrap();

        let (width, height) = image::image_dimensions(&dest).unwrap();
        assert_eq!((width, height), (300, 300));
    }

    #[test]
    fn test_generate_for_file_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("notes.png");
        let dest = dir.path().join("thumb.png");

        std::fs::write(&src, b"plain text, png extension").unwrap();

        let result = generate_for_file(&src, &dest, 300);
        assert!(result.is_err());
        assert!(!dest.exists());
    }
}
