//! # Storage Layer
//!
//! This module defines the storage abstraction for dearly. The [`DataStore`] trait
//! is the only way the rest of the library touches persisted cards.
//!
//! ## Two Kinds of State
//!
//! A card lives in two places:
//! 1. **Record**: one row in the record backend (SQLite in production) holding
//!    metadata and the *relative* paths of its face images.
//! 2. **Images**: one JPEG per face under `CardImages/{uuid}/`, owned by an
//!    [`ImageStorage`].
//!
//! [`card_store::CardStore`] keeps the two in lockstep. Nothing else writes
//! records or images.
//!
//! ## Ordering of Writes
//!
//! - **Add**: images are written first (via [`DataStore::save_images`]), then the
//!   record referencing them is inserted. There is no transaction spanning both;
//!   a crash in between leaves an orphan image directory, which `doctor` removes.
//! - **Delete**: images are removed first, then the record. Removing the record is
//!   the success signal; a failed image cleanup is logged and left for `doctor`.
//!   Deleting a card that is already gone is not an error.
//!
//! ## Reconciliation (`doctor`)
//!
//! Never runs implicitly. It:
//! 1. **Orphan Cleanup**: image directory for an id with no record → deleted.
//! 2. **Dangling Count**: record path whose file is missing → counted. The path is
//!    kept; the collection renders it as a placeholder.
//!
//! ## Implementations
//!
//! - [`sqlite_backend::SqliteBackend`]: production record storage.
//! - [`mem_backend::MemBackend`]: records in memory, for tests.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── dearly.sqlite              # Card records
//! └── CardImages/{uuid}/*.jpg    # Face images
//! ```

use crate::error::Result;
use crate::images::ImageStorage;
use crate::model::{Card, CardFaces};
use uuid::Uuid;

pub mod backend;
pub mod card_store;
pub mod mem_backend;
pub mod sqlite_backend;

/// Report from the `doctor` operation.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    /// Image directories removed because no record referenced their id.
    pub removed_orphan_dirs: usize,
    /// Stored face paths whose file no longer exists.
    pub dangling_image_paths: usize,
    /// Faces that were never saved (write failed at scan time).
    pub missing_faces: usize,
}

impl DoctorReport {
    pub fn is_clean(&self) -> bool {
        self.removed_orphan_dirs == 0 && self.dangling_image_paths == 0
    }
}

/// Abstract interface for card storage.
///
/// Every operation returns a `Result`; callers decide which failures are soft.
pub trait DataStore {
    type Images: ImageStorage;

    /// All cards, newest `date_scanned` first.
    fn fetch_all_cards(&self) -> Result<Vec<Card>>;

    /// Get a card by ID
    fn get_card(&self, id: &Uuid) -> Result<Card>;

    /// Insert a new card. Its images must already be saved.
    fn add_card(&mut self, card: &Card) -> Result<()>;

    /// Persist favorite and metadata changes of an existing card.
    fn update_card(&mut self, card: &Card) -> Result<()>;

    /// Delete a card's images, then its record. Idempotent.
    fn delete_card(&mut self, id: &Uuid) -> Result<()>;

    /// Save every provided face. A face that fails to save comes back as `None`.
    fn save_images(&mut self, faces: &CardFaces<Vec<u8>>, card_id: Uuid)
        -> CardFaces<Option<String>>;

    /// Delete every card, then wipe the image root.
    fn clear_all_data(&mut self) -> Result<()>;

    /// Read access to face images.
    fn images(&self) -> &Self::Images;

    /// Verify and fix consistency issues between records and images.
    fn doctor(&mut self) -> Result<DoctorReport>;
}
