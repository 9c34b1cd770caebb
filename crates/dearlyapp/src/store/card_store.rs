use super::backend::RecordBackend;
use super::{DataStore, DoctorReport};
use crate::error::{DearlyError, Result};
use crate::images::ImageStorage;
use crate::model::{Card, CardFaces};
use std::collections::HashSet;
use tracing::{debug, warn};
use uuid::Uuid;

pub struct CardStore<B: RecordBackend, I: ImageStorage> {
    /// The underlying record backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    pub(crate) images: I,
}

impl<B: RecordBackend, I: ImageStorage> CardStore<B, I> {
    pub fn new(backend: B, images: I) -> Self {
        Self { backend, images }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: RecordBackend, I: ImageStorage> DataStore for CardStore<B, I> {
    type Images = I;

    fn fetch_all_cards(&self) -> Result<Vec<Card>> {
        let mut cards = self.backend.load_cards()?;
        cards.sort_by(|a, b| b.date_scanned().cmp(&a.date_scanned()));
        Ok(cards)
    }

    fn get_card(&self, id: &Uuid) -> Result<Card> {
        self.backend
            .load_card(id)?
            .ok_or(DearlyError::CardNotFound(*id))
    }

    fn add_card(&mut self, card: &Card) -> Result<()> {
        self.backend.insert_card(card)?;
        debug!(card_id = %card.id(), card_type = %card.card_type(), "added card");
        Ok(())
    }

    fn update_card(&mut self, card: &Card) -> Result<()> {
        self.backend.update_card(card)
    }

    fn delete_card(&mut self, id: &Uuid) -> Result<()> {
        // 1. Images first, so a failed record delete never strands files we can no longer find.
        if let Err(e) = self.images.delete_images(*id) {
            warn!(card_id = %id, error = %e, "failed to delete card images");
        }

        // 2. Record removal is the success signal.
        if self.backend.delete_card(id)? {
            debug!(card_id = %id, "deleted card");
        }
        Ok(())
    }

    fn save_images(
        &mut self,
        faces: &CardFaces<Vec<u8>>,
        card_id: Uuid,
    ) -> CardFaces<Option<String>> {
        faces.as_ref().map(|side, bytes| {
            match self.images.save_image(bytes, card_id, side) {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(card_id = %card_id, side = %side, error = %e, "image not saved");
                    None
                }
            }
        })
    }

    fn clear_all_data(&mut self) -> Result<()> {
        for id in self.backend.card_ids()? {
            self.delete_card(&id)?;
        }
        self.images.clear_all_images()?;
        debug!("cleared all card data");
        Ok(())
    }

    fn images(&self) -> &I {
        &self.images
    }

    fn doctor(&mut self) -> Result<DoctorReport> {
        let mut report = DoctorReport::default();
        let known: HashSet<Uuid> = self.backend.card_ids()?.into_iter().collect();

        // 1. Orphan image directories
        for dir_id in self.images.list_card_dirs()? {
            if !known.contains(&dir_id) {
                self.images.delete_images(dir_id)?;
                report.removed_orphan_dirs += 1;
            }
        }

        // 2. Paths pointing at nothing
        for card in self.backend.load_cards()? {
            for (_, path) in card.faces().iter() {
                match path {
                    Some(path) if !self.images.image_exists(path) => {
                        report.dangling_image_paths += 1
                    }
                    Some(_) => {}
                    None => report.missing_faces += 1,
                }
            }
        }

        Ok(report)
    }
}
