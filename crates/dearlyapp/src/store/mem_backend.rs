use super::backend::RecordBackend;
use crate::error::{DearlyError, Result};
use crate::model::Card;
use std::cell::RefCell;
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory record backend for testing.
///
/// Uses `RefCell` for interior mutability since dearly is single-threaded.
/// This avoids the overhead of `RwLock` while still allowing the
/// `RecordBackend` trait to use `&self` for all methods.
#[derive(Default)]
pub struct MemBackend {
    cards: RefCell<HashMap<Uuid, Card>>,
    simulate_write_error: RefCell<bool>,
    simulate_read_error: RefCell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Enable read error simulation for testing the fail-soft load path.
    pub fn set_simulate_read_error(&self, simulate: bool) {
        *self.simulate_read_error.borrow_mut() = simulate;
    }

    fn check_write(&self) -> Result<()> {
        if *self.simulate_write_error.borrow() {
            return Err(DearlyError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<()> {
        if *self.simulate_read_error.borrow() {
            return Err(DearlyError::Store("Simulated read error".to_string()));
        }
        Ok(())
    }
}

impl RecordBackend for MemBackend {
    fn load_cards(&self) -> Result<Vec<Card>> {
        self.check_read()?;
        Ok(self.cards.borrow().values().cloned().collect())
    }

    fn load_card(&self, id: &Uuid) -> Result<Option<Card>> {
        self.check_read()?;
        Ok(self.cards.borrow().get(id).cloned())
    }

    fn insert_card(&self, card: &Card) -> Result<()> {
        self.check_write()?;
        let mut cards = self.cards.borrow_mut();
        if cards.contains_key(&card.id()) {
            return Err(DearlyError::DuplicateCard(card.id()));
        }
        cards.insert(card.id(), card.clone());
        Ok(())
    }

    fn update_card(&self, card: &Card) -> Result<()> {
        self.check_write()?;
        let mut cards = self.cards.borrow_mut();
        let stored = cards
            .get_mut(&card.id())
            .ok_or(DearlyError::CardNotFound(card.id()))?;
        stored.is_favorite = card.is_favorite;
        stored.metadata = card.metadata.clone();
        Ok(())
    }

    fn delete_card(&self, id: &Uuid) -> Result<bool> {
        self.check_write()?;
        Ok(self.cards.borrow_mut().remove(id).is_some())
    }

    fn card_ids(&self) -> Result<Vec<Uuid>> {
        self.check_read()?;
        Ok(self.cards.borrow().keys().copied().collect())
    }
}
