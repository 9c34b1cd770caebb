use crate::error::Result;
use crate::model::Card;
use uuid::Uuid;

/// Abstract interface for raw record I/O.
/// This trait handles the "how" of storing card records (SQLite vs memory),
/// while CardStore handles the "what" (image coordination, ordering, doctor).
pub trait RecordBackend {
    /// Load every record. No particular order is guaranteed.
    fn load_cards(&self) -> Result<Vec<Card>>;

    /// Load one record. Returns Ok(None) if there is no such card.
    fn load_card(&self, id: &Uuid) -> Result<Option<Card>>;

    /// Insert a new record and persist it immediately.
    /// Fails with `DuplicateCard` if the id is already stored.
    fn insert_card(&self, card: &Card) -> Result<()>;

    /// Persist favorite state and metadata of an existing record.
    /// Image paths and the scan date are never rewritten.
    /// Fails with `CardNotFound` if the id is not stored.
    fn update_card(&self, card: &Card) -> Result<()>;

    /// Remove a record. Returns whether it existed.
    fn delete_card(&self, id: &Uuid) -> Result<bool>;

    /// Ids of every stored record (for reconciliation).
    fn card_ids(&self) -> Result<Vec<Uuid>>;
}
