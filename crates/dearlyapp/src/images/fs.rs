use super::{
    codec, relative_image_path, resolve_under, ImageStorage, DEFAULT_JPEG_QUALITY, IMAGES_DIR,
};
use crate::error::{DearlyError, Result};
use crate::model::ImageSide;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// On-disk face storage rooted at the app's persistent storage directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    quality: u8,
}

impl ImageStore {
    /// Creates the store without touching the disk. Directories are created on first write.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Creates the store and makes sure `CardImages/` exists.
    pub fn open(root: PathBuf) -> Result<Self> {
        let store = Self::new(root);
        store.ensure_dir(&store.images_dir())?;
        Ok(store)
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }

    fn card_dir(&self, card_id: Uuid) -> PathBuf {
        self.images_dir().join(card_id.to_string())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(DearlyError::Io)?;
        }
        Ok(())
    }
}

impl ImageStorage for ImageStore {
    fn save_image(&self, bytes: &[u8], card_id: Uuid, side: ImageSide) -> Result<String> {
        let jpeg = codec::compress_to_jpeg(bytes, self.quality)?;
        let card_dir = self.card_dir(card_id);
        self.ensure_dir(&card_dir)?;

        let relative = relative_image_path(card_id, side);
        let target = self.root.join(&relative);

        // Atomic write
        let tmp_path = card_dir.join(format!(".{}-{}.tmp", side.file_stem(), Uuid::new_v4()));
        fs::write(&tmp_path, &jpeg).map_err(DearlyError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &target) {
            let _ = fs::remove_file(&tmp_path);
            return Err(DearlyError::Io(e));
        }

        debug!(card_id = %card_id, side = %side, bytes = jpeg.len(), "saved card image");
        Ok(relative)
    }

    fn load_image_bytes(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let Some(path) = resolve_under(&self.root, relative_path) else {
            warn!(
                path = relative_path,
                "refusing image path outside the storage root"
            );
            return Ok(None);
        };
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "image file not found");
                Ok(None)
            }
            Err(e) => Err(DearlyError::Io(e)),
        }
    }

    fn delete_images(&self, card_id: Uuid) -> Result<()> {
        let card_dir = self.card_dir(card_id);
        match fs::remove_dir_all(&card_dir) {
            Ok(()) => {
                debug!(card_id = %card_id, "deleted card images");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DearlyError::Io(e)),
        }
    }

    fn clear_all_images(&self) -> Result<()> {
        let images_dir = self.images_dir();
        match fs::remove_dir_all(&images_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DearlyError::Io(e)),
        }
        self.ensure_dir(&images_dir)?;
        debug!("cleared all card images");
        Ok(())
    }

    fn image_exists(&self, relative_path: &str) -> bool {
        resolve_under(&self.root, relative_path).is_some_and(|p| p.is_file())
    }

    fn full_path(&self, relative_path: &str) -> Option<PathBuf> {
        resolve_under(&self.root, relative_path)
    }

    fn list_card_dirs(&self) -> Result<Vec<Uuid>> {
        let images_dir = self.images_dir();
        if !images_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&images_dir).map_err(DearlyError::Io)? {
            let path = entry.map_err(DearlyError::Io)?.path();
            if !path.is_dir() {
                continue;
            }
            if let Some(id) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| Uuid::parse_str(name).ok())
            {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
