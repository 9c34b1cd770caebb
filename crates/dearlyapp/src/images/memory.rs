use super::{codec, relative_image_path, ImageStorage, DEFAULT_JPEG_QUALITY, IMAGES_DIR};
use crate::error::{DearlyError, Result};
use crate::model::ImageSide;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use uuid::Uuid;

/// In-memory face storage for testing.
///
/// Images still go through JPEG compression so loads behave like the real
/// store. `RefCell` keeps the trait on `&self` without locking.
pub struct MemImageStore {
    files: RefCell<BTreeMap<String, Vec<u8>>>,
    quality: u8,
    simulate_write_error: RefCell<bool>,
    fail_sides: RefCell<HashSet<ImageSide>>,
}

impl Default for MemImageStore {
    fn default() -> Self {
        Self {
            files: RefCell::new(BTreeMap::new()),
            quality: DEFAULT_JPEG_QUALITY,
            simulate_write_error: RefCell::new(false),
            fail_sides: RefCell::new(HashSet::new()),
        }
    }
}

impl MemImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for every side.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Make writes of one particular side fail, to exercise partial saves.
    pub fn fail_side(&self, side: ImageSide) {
        self.fail_sides.borrow_mut().insert(side);
    }

    pub fn file_count(&self) -> usize {
        self.files.borrow().len()
    }

    /// Drop a stored file behind the store's back, leaving any record pointing at it dangling.
    pub fn remove_file(&self, relative_path: &str) -> bool {
        self.files.borrow_mut().remove(relative_path).is_some()
    }

    /// Plant raw bytes at a path, bypassing compression.
    pub fn insert_raw(&self, relative_path: &str, bytes: Vec<u8>) {
        self.files
            .borrow_mut()
            .insert(relative_path.to_string(), bytes);
    }

    fn card_prefix(card_id: Uuid) -> String {
        format!("{}/{}/", IMAGES_DIR, card_id)
    }
}

impl ImageStorage for MemImageStore {
    fn save_image(&self, bytes: &[u8], card_id: Uuid, side: ImageSide) -> Result<String> {
        if *self.simulate_write_error.borrow() || self.fail_sides.borrow().contains(&side) {
            return Err(DearlyError::Store("Simulated write error".to_string()));
        }
        let jpeg = codec::compress_to_jpeg(bytes, self.quality)?;
        let relative = relative_image_path(card_id, side);
        self.files.borrow_mut().insert(relative.clone(), jpeg);
        Ok(relative)
    }

    fn load_image_bytes(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.borrow().get(relative_path).cloned())
    }

    fn delete_images(&self, card_id: Uuid) -> Result<()> {
        let prefix = Self::card_prefix(card_id);
        self.files.borrow_mut().retain(|path, _| !path.starts_with(&prefix));
        Ok(())
    }

    fn clear_all_images(&self) -> Result<()> {
        self.files.borrow_mut().clear();
        Ok(())
    }

    fn image_exists(&self, relative_path: &str) -> bool {
        self.files.borrow().contains_key(relative_path)
    }

    fn full_path(&self, relative_path: &str) -> Option<PathBuf> {
        Some(PathBuf::from(format!("memory://{}", relative_path)))
    }

    fn list_card_dirs(&self) -> Result<Vec<Uuid>> {
        let mut ids: Vec<Uuid> = self
            .files
            .borrow()
            .keys()
            .filter_map(|path| path.split('/').nth(1))
            .filter_map(|segment| Uuid::parse_str(segment).ok())
            .collect();
        ids.dedup();
        Ok(ids)
    }
}
