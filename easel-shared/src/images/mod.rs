/// Image handling for Easel
///
/// This module owns everything between an accepted upload and the bytes on
/// disk: validation, storage naming, re-encoding, and thumbnails.
///
/// # Modules
///
/// - `store`: upload validation and filesystem storage
/// - `thumbnails`: shrink-only thumbnail generation
///
/// # Example
///
/// ```no_run
/// use easel_shared::images::store::ImageStore;
///
/// # fn example(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
/// let store = ImageStore::new("data/uploads", 4000, 300);
/// store.initialize()?;
/// let filename = store.save_upload("cat.png", Some("image/png"), bytes)?;
/// # Ok(())
/// # }
/// ```

pub mod store;
pub mod thumbnails;
