//! # Image Storage
//!
//! Card faces are stored as individual JPEG files, one directory per card:
//!
//! ```text
//! <root>/
//! └── CardImages/
//!     └── {card-uuid}/
//!         ├── front.jpg
//!         ├── back.jpg
//!         ├── insideLeft.jpg
//!         └── insideRight.jpg
//! ```
//!
//! ## Relative Paths
//!
//! Records never hold absolute paths. [`ImageStorage::save_image`] returns a
//! path relative to the storage root (`CardImages/{uuid}/front.jpg`, always with
//! `/` separators) and every read resolves it against the root the store was
//! opened with. Moving the whole root, or the OS relocating the app container,
//! leaves stored references valid.
//!
//! ## Compression
//!
//! Whatever format the scanner hands over, faces are re-encoded as JPEG at a
//! fixed quality ([`DEFAULT_JPEG_QUALITY`], overridable in config). See [`codec`].
//!
//! ## Failure Model
//!
//! - Writes return errors. The card store decides that a failed face becomes a
//!   missing face rather than a failed card.
//! - A missing file, or no path at all, loads as `Ok(None)`.
//! - Deletes are idempotent: removing a card directory that is not there is fine.
//!
//! ## Implementations
//!
//! - [`fs::ImageStore`]: production, on disk.
//! - [`memory::MemImageStore`]: in-memory, for tests, with write-failure simulation.

use crate::error::Result;
use crate::model::ImageSide;
use image::DynamicImage;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

pub mod codec;
pub mod fs;
pub mod memory;

/// Directory under the storage root holding all card images.
pub const IMAGES_DIR: &str = "CardImages";

/// JPEG quality used when nothing else is configured (0.8 on a 0-1 scale).
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Abstract interface for face image I/O.
///
/// All methods take `&self`; implementations own their interior mutability.
pub trait ImageStorage {
    /// Compress and store one face. Returns the path relative to the storage root.
    fn save_image(&self, bytes: &[u8], card_id: Uuid, side: ImageSide) -> Result<String>;

    /// Read the stored (encoded) bytes. `Ok(None)` when the file is missing.
    fn load_image_bytes(&self, relative_path: &str) -> Result<Option<Vec<u8>>>;

    /// Load and decode a face. `Ok(None)` for no path or a missing file.
    fn load_image(&self, relative_path: Option<&str>) -> Result<Option<DynamicImage>> {
        let Some(relative_path) = relative_path else {
            return Ok(None);
        };
        match self.load_image_bytes(relative_path)? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Remove every image of a card. Missing directory is not an error.
    fn delete_images(&self, card_id: Uuid) -> Result<()>;

    /// Remove all images and leave an empty image root behind.
    fn clear_all_images(&self) -> Result<()>;

    fn image_exists(&self, relative_path: &str) -> bool;

    /// Absolute location of a stored image, for clients that want to open it directly.
    fn full_path(&self, relative_path: &str) -> Option<PathBuf>;

    /// Ids of every card that currently owns an image directory.
    fn list_card_dirs(&self) -> Result<Vec<Uuid>>;
}

/// `CardImages/{card_id}/{side}.jpg`
pub fn relative_image_path(card_id: Uuid, side: ImageSide) -> String {
    format!("{}/{}/{}.jpg", IMAGES_DIR, card_id, side.file_stem())
}

/// Resolves a stored relative path against `root`.
///
/// Absolute paths and anything with `..` are rejected so a record can never
/// point (or delete) outside the managed tree.
pub(crate) fn resolve_under(root: &Path, relative_path: &str) -> Option<PathBuf> {
    let relative = Path::new(relative_path);
    if relative_path.is_empty() {
        return None;
    }
    let contained = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    contained.then(|| root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_use_side_stems() {
        let id = Uuid::new_v4();
        assert_eq!(
            relative_image_path(id, ImageSide::InsideRight),
            format!("CardImages/{}/insideRight.jpg", id)
        );
    }

    #[test]
    fn resolve_rejects_escaping_paths() {
        let root = Path::new("/data/dearly");
        assert_eq!(
            resolve_under(root, "CardImages/a/front.jpg"),
            Some(root.join("CardImages/a/front.jpg"))
        );
        assert_eq!(resolve_under(root, "../etc/passwd"), None);
        assert_eq!(resolve_under(root, "/etc/passwd"), None);
        assert_eq!(resolve_under(root, ""), None);
    }
}
