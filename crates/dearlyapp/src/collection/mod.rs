//! # Card Collection
//!
//! [`CardCollection`] is the in-memory view of every card plus the browsing
//! state around it (sort mode, occasion filter, search text, selection). Clients
//! read from it and send every mutation through it.
//!
//! ## Write-Through
//!
//! Each mutation goes to the [`DataStore`] first. The cached list changes only
//! after the store reports success, so a failed write leaves the collection
//! exactly as it was and the error is returned to the caller.
//!
//! ## Soft Failures
//!
//! Two failures never reach the caller:
//! - A record read failure on [`CardCollection::load`] is logged and the
//!   collection starts empty.
//! - A face that is missing, dangling or undecodable becomes a
//!   [`FaceView::Placeholder`].
//!
//! ## Cache Order
//!
//! After a load the cache is newest first. New cards are inserted at the head.
//! The `favorites` sort mode filters in this order rather than sorting.

use crate::error::{DearlyError, Result};
use crate::images::ImageStorage;
use crate::model::{Card, CardFaces, CardMetadata, ImageSide};
use crate::scan::ScanSession;
use crate::store::{DataStore, DoctorReport};
use image::DynamicImage;
use tracing::{debug, error, warn};
use uuid::Uuid;

pub mod query;
pub mod selection;
pub mod selector;

pub use query::{CardQuery, SortOption};
pub use selection::{Selection, SelectionMode};
pub use selector::CardSelector;

/// What to show for one face of a card.
#[derive(Debug, Clone)]
pub enum FaceView {
    Image(DynamicImage),
    Placeholder { side: ImageSide, label: &'static str },
}

impl FaceView {
    fn placeholder(side: ImageSide) -> Self {
        FaceView::Placeholder {
            side,
            label: side.title(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, FaceView::Placeholder { .. })
    }
}

/// Result of a bulk action over the selection. Cards are processed
/// independently; one failure does not stop the rest.
#[derive(Debug, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<(Uuid, DearlyError)>,
}

impl BulkOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct CardCollection<S: DataStore> {
    store: S,
    cards: Vec<Card>,
    query: CardQuery,
    selection: Selection,
}

impl<S: DataStore> CardCollection<S> {
    /// Loads every card from `store`. A read failure is logged and yields an
    /// empty collection.
    pub fn load(store: S) -> Self {
        let cards = match store.fetch_all_cards() {
            Ok(cards) => cards,
            Err(e) => {
                error!(error = %e, "failed to load cards, starting with an empty collection");
                Vec::new()
            }
        };
        debug!(count = cards.len(), "loaded card collection");
        Self {
            store,
            cards,
            query: CardQuery::default(),
            selection: Selection::default(),
        }
    }

    /// Refetches from the store. On failure the cache is left as it was.
    pub fn reload(&mut self) -> Result<()> {
        self.cards = self.store.fetch_all_cards()?;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // --- Reading ---

    pub fn all_cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, id: &Uuid) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == *id)
    }

    /// Cards as the browsing view shows them: occasion filter, search, sort.
    pub fn sorted_cards(&self) -> Vec<&Card> {
        self.query.apply(&self.cards)
    }

    pub fn available_occasions(&self) -> Vec<String> {
        query::available_occasions(&self.cards)
    }

    /// Resolves selectors against the unfiltered newest-first listing.
    pub fn resolve(&self, selectors: &[CardSelector]) -> Result<Vec<Uuid>> {
        let listing = CardQuery::default().apply(&self.cards);
        selector::resolve_selectors(&listing, selectors)
    }

    pub fn face_view(&self, card: &Card, side: ImageSide) -> FaceView {
        let Some(path) = card.image_path(side) else {
            return FaceView::placeholder(side);
        };
        match self.store.images().load_image(Some(path)) {
            Ok(Some(image)) => FaceView::Image(image),
            Ok(None) => {
                warn!(card_id = %card.id(), side = %side, path, "face image is missing");
                FaceView::placeholder(side)
            }
            Err(e) => {
                warn!(
                    card_id = %card.id(),
                    side = %side,
                    path,
                    error = %e,
                    "face image unreadable"
                );
                FaceView::placeholder(side)
            }
        }
    }

    // --- Browsing state ---

    pub fn query(&self) -> &CardQuery {
        &self.query
    }

    pub fn sort_option(&self) -> SortOption {
        self.query.sort
    }

    pub fn set_sort_option(&mut self, sort: SortOption) {
        self.query.sort = sort;
    }

    pub fn occasion_filter(&self) -> Option<&str> {
        self.query.occasion.as_deref()
    }

    pub fn set_occasion_filter(&mut self, occasion: Option<String>) {
        self.query.occasion = occasion;
    }

    pub fn search_text(&self) -> Option<&str> {
        self.query.search.as_deref()
    }

    pub fn set_search_text(&mut self, search: Option<String>) {
        self.query.search = search;
    }

    // --- Mutations ---

    pub fn add_card(&mut self, faces: CardFaces<Vec<u8>>, metadata: CardMetadata) -> Result<Card> {
        self.add_with(&faces, |id, paths| Card::new(id, paths, metadata))
    }

    /// Saves the images, lets `build` assemble the record around their paths,
    /// then persists it. If the record cannot be written the new images are
    /// removed again.
    pub(crate) fn add_with(
        &mut self,
        faces: &CardFaces<Vec<u8>>,
        build: impl FnOnce(Uuid, CardFaces<Option<String>>) -> Card,
    ) -> Result<Card> {
        let id = Uuid::new_v4();
        let paths = self.store.save_images(faces, id);
        let card = build(id, paths);

        if let Err(e) = self.store.add_card(&card) {
            if let Err(cleanup) = self.store.delete_card(&id) {
                warn!(card_id = %id, error = %cleanup, "failed to remove images of unsaved card");
            }
            return Err(e);
        }

        self.cards.insert(0, card.clone());
        Ok(card)
    }

    /// Finishes `session` and adds the card, then resets the view so the new
    /// card shows first.
    pub fn add_scanned_card(
        &mut self,
        session: ScanSession,
        metadata: CardMetadata,
    ) -> Result<Card> {
        let faces = session.finish()?;
        let card = self.add_card(faces, metadata)?;
        self.query.sort = SortOption::Newest;
        self.query.occasion = None;
        Ok(card)
    }

    pub fn delete_card(&mut self, id: &Uuid) -> Result<()> {
        self.store.delete_card(id)?;
        self.cards.retain(|card| card.id() != *id);
        self.selection.forget(id);
        Ok(())
    }

    /// Flips the favorite flag. Returns the new value.
    pub fn toggle_favorite(&mut self, id: &Uuid) -> Result<bool> {
        let index = self.position(id)?;
        let value = !self.cards[index].is_favorite;
        self.set_favorite_at(index, value)?;
        Ok(value)
    }

    pub fn update_metadata(&mut self, id: &Uuid, metadata: CardMetadata) -> Result<&Card> {
        let index = self.position(id)?;
        let mut updated = self.cards[index].clone();
        updated.metadata = metadata.normalized();
        self.store.update_card(&updated)?;
        self.cards[index] = updated;
        Ok(&self.cards[index])
    }

    pub fn clear_all_data(&mut self) -> Result<()> {
        self.store.clear_all_data()?;
        self.cards.clear();
        self.selection.exit();
        Ok(())
    }

    pub fn doctor(&mut self) -> Result<DoctorReport> {
        self.store.doctor()
    }

    fn position(&self, id: &Uuid) -> Result<usize> {
        self.cards
            .iter()
            .position(|card| card.id() == *id)
            .ok_or(DearlyError::CardNotFound(*id))
    }

    fn set_favorite_at(&mut self, index: usize, value: bool) -> Result<()> {
        let mut updated = self.cards[index].clone();
        updated.is_favorite = value;
        self.store.update_card(&updated)?;
        self.cards[index] = updated;
        Ok(())
    }

    // --- Selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selecting(&self) -> bool {
        self.selection.is_selecting()
    }

    pub fn enter_selection_mode(&mut self, preselect: Option<Uuid>) {
        self.selection.enter(preselect);
    }

    pub fn exit_selection_mode(&mut self) {
        self.selection.exit();
    }

    pub fn toggle_card_selection(&mut self, id: Uuid) -> bool {
        self.selection.toggle(id)
    }

    /// Selects every card the browsing view currently shows.
    pub fn select_all_cards(&mut self) {
        let visible: Vec<Uuid> = self.sorted_cards().iter().map(|card| card.id()).collect();
        self.selection.select_all(visible);
    }

    pub fn deselect_all_cards(&mut self) {
        self.selection.clear();
    }

    pub fn favorite_selected_cards(&mut self) -> BulkOutcome {
        self.set_favorite_selected(true)
    }

    pub fn unfavorite_selected_cards(&mut self) -> BulkOutcome {
        self.set_favorite_selected(false)
    }

    pub fn delete_selected_cards(&mut self) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for id in self.selected_in_order() {
            match self.delete_card(&id) {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    warn!(card_id = %id, error = %e, "bulk delete failed for card");
                    outcome.failed.push((id, e));
                }
            }
        }
        self.selection.exit();
        outcome
    }

    fn set_favorite_selected(&mut self, value: bool) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for id in self.selected_in_order() {
            let result = self
                .position(&id)
                .and_then(|index| self.set_favorite_at(index, value));
            match result {
                Ok(()) => outcome.succeeded.push(id),
                Err(e) => {
                    warn!(card_id = %id, error = %e, "bulk favorite failed for card");
                    outcome.failed.push((id, e));
                }
            }
        }
        self.selection.exit();
        outcome
    }

    /// Selected ids in cache order.
    fn selected_in_order(&self) -> Vec<Uuid> {
        self.cards
            .iter()
            .map(|card| card.id())
            .filter(|id| self.selection.contains(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::memory::MemImageStore;
    use crate::model::CardType;
    use crate::store::card_store::CardStore;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{flat_faces, mem_collection, traditional_faces};

    type MemCollection = CardCollection<CardStore<MemBackend, MemImageStore>>;

    fn add(collection: &mut MemCollection, sender: &str, occasion: &str) -> Card {
        collection
            .add_card(
                traditional_faces(),
                CardMetadata::default()
                    .with_sender(sender)
                    .with_occasion(occasion),
            )
            .unwrap()
    }

    #[test]
    fn added_card_is_fetched_once_and_sorts_first() {
        let mut collection = mem_collection();
        add(&mut collection, "Dad", "Birthday");
        let card = add(&mut collection, "Mom", "Holiday");

        let stored = collection.store().fetch_all_cards().unwrap();
        assert_eq!(stored.iter().filter(|c| c.id() == card.id()).count(), 1);
        assert_eq!(collection.sorted_cards()[0].id(), card.id());
        assert_eq!(collection.all_cards()[0].id(), card.id());
    }

    #[test]
    fn load_reads_existing_cards() {
        let mut collection = mem_collection();
        add(&mut collection, "Mom", "Birthday");
        add(&mut collection, "Dad", "Birthday");

        let reloaded = CardCollection::load(collection.into_store());
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn load_degrades_to_empty_on_read_failure() {
        let mut collection = mem_collection();
        add(&mut collection, "Mom", "Birthday");
        let store = collection.into_store();
        store.backend().set_simulate_read_error(true);

        let collection = CardCollection::load(store);
        assert!(collection.is_empty());
    }

    #[test]
    fn delete_removes_record_cache_entry_and_images() {
        let mut collection = mem_collection();
        let card = add(&mut collection, "Mom", "Birthday");
        assert_eq!(collection.store().images().file_count(), 4);

        collection.delete_card(&card.id()).unwrap();
        assert!(collection.card(&card.id()).is_none());
        assert!(collection.store().fetch_all_cards().unwrap().is_empty());
        assert_eq!(collection.store().images().file_count(), 0);

        collection.delete_card(&card.id()).unwrap();
    }

    #[test]
    fn toggle_favorite_twice_restores_and_persists_each_time() {
        let mut collection = mem_collection();
        let card = add(&mut collection, "Mom", "Birthday");
        let id = card.id();

        assert!(collection.toggle_favorite(&id).unwrap());
        assert!(collection.store().get_card(&id).unwrap().is_favorite);

        assert!(!collection.toggle_favorite(&id).unwrap());
        assert!(!collection.store().get_card(&id).unwrap().is_favorite);
        assert_eq!(collection.card(&id).unwrap().is_favorite, card.is_favorite);
    }

    #[test]
    fn failed_write_leaves_cache_unchanged() {
        let mut collection = mem_collection();
        let card = add(&mut collection, "Mom", "Birthday");
        collection.store().backend().set_simulate_write_error(true);

        assert!(collection.toggle_favorite(&card.id()).is_err());
        assert!(!collection.card(&card.id()).unwrap().is_favorite);

        assert!(collection
            .update_metadata(&card.id(), CardMetadata::default().with_sender("Dad"))
            .is_err());
        assert_eq!(
            collection.card(&card.id()).unwrap().metadata.sender.as_deref(),
            Some("Mom")
        );

        assert!(collection.delete_card(&card.id()).is_err());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn failed_insert_removes_new_images() {
        let mut collection = mem_collection();
        collection.store().backend().set_simulate_write_error(true);

        let result = collection.add_card(traditional_faces(), CardMetadata::default());
        assert!(result.is_err());
        assert!(collection.is_empty());
        assert_eq!(collection.store().images().file_count(), 0);
    }

    #[test]
    fn failed_face_still_creates_the_card() {
        let mut collection = mem_collection();
        collection.store().images().fail_side(ImageSide::Back);

        let card = collection
            .add_card(traditional_faces(), CardMetadata::default())
            .unwrap();
        assert!(card.back_image_path().is_none());
        assert!(card.front_image_path().is_some());
        assert!(collection
            .face_view(&card, ImageSide::Back)
            .is_placeholder());
        assert!(!collection
            .face_view(&card, ImageSide::Front)
            .is_placeholder());
    }

    #[test]
    fn update_metadata_persists() {
        let mut collection = mem_collection();
        let card = add(&mut collection, "Mom", "Birthday");
        let edited = CardMetadata::default()
            .with_sender("Aunt Sarah")
            .with_notes("  kept in the drawer  ");

        let updated = collection.update_metadata(&card.id(), edited).unwrap();
        assert_eq!(
            updated.metadata.notes.as_deref(),
            Some("kept in the drawer")
        );

        let stored = collection.store().get_card(&card.id()).unwrap();
        assert_eq!(stored.metadata.sender.as_deref(), Some("Aunt Sarah"));
        assert_eq!(stored.metadata.occasion, None);
        assert_eq!(stored.date_scanned(), card.date_scanned());
    }

    #[test]
    fn flat_cards_render_inside_placeholders() {
        let mut collection = mem_collection();
        let card = collection
            .add_card(flat_faces(), CardMetadata::default())
            .unwrap();

        assert_eq!(card.card_type(), CardType::Flat);
        assert!(card.inside_left_image_path().is_none());
        assert!(card.inside_right_image_path().is_none());
        match collection.face_view(&card, ImageSide::InsideLeft) {
            FaceView::Placeholder { label, .. } => assert_eq!(label, "Inside Left"),
            FaceView::Image(_) => panic!("flat card has no inside image"),
        }
    }

    #[test]
    fn dangling_and_corrupt_faces_become_placeholders() {
        let mut collection = mem_collection();
        let card = add(&mut collection, "Mom", "Birthday");
        let images = collection.store().images();
        images.remove_file(card.front_image_path().unwrap());
        images.insert_raw(card.back_image_path().unwrap(), b"garbage".to_vec());

        assert!(collection
            .face_view(&card, ImageSide::Front)
            .is_placeholder());
        assert!(collection
            .face_view(&card, ImageSide::Back)
            .is_placeholder());
        assert!(!collection
            .face_view(&card, ImageSide::InsideLeft)
            .is_placeholder());
    }

    #[test]
    fn search_and_occasion_filters() {
        let mut collection = mem_collection();
        add(&mut collection, "Mom", "Birthday");
        add(&mut collection, "Dad", "Holiday");
        add(&mut collection, "Grandma", "Birthday");

        collection.set_search_text(Some("mom".to_string()));
        let found = collection.sorted_cards();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].metadata.sender.as_deref(), Some("Mom"));

        collection.set_search_text(None);
        collection.set_occasion_filter(Some("Birthday".to_string()));
        assert_eq!(collection.sorted_cards().len(), 2);
        assert_eq!(
            collection.available_occasions(),
            vec!["Birthday", "Holiday"]
        );
    }

    #[test]
    fn scanned_card_resets_the_view() {
        let mut collection = mem_collection();
        collection.set_sort_option(SortOption::Oldest);
        collection.set_occasion_filter(Some("Holiday".to_string()));

        let session = ScanSession::from_scanner_images(
            CardType::Flat,
            match flat_faces() {
                CardFaces::TwoSided { front, back } => vec![front, back],
                CardFaces::Traditional { .. } => unreachable!(),
            },
        );
        let card = collection
            .add_scanned_card(session, CardMetadata::default().with_sender("Mom"))
            .unwrap();

        assert_eq!(collection.sort_option(), SortOption::Newest);
        assert_eq!(collection.occasion_filter(), None);
        assert_eq!(collection.sorted_cards()[0].id(), card.id());
    }

    #[test]
    fn incomplete_scan_persists_nothing() {
        let mut collection = mem_collection();
        let mut session = ScanSession::new(CardType::Traditional);
        session
            .capture(ImageSide::Front, crate::test_utils::png_bytes())
            .unwrap();

        assert!(matches!(
            collection.add_scanned_card(session, CardMetadata::default()),
            Err(DearlyError::IncompleteScan { .. })
        ));
        assert!(collection.is_empty());
        assert_eq!(collection.store().images().file_count(), 0);
    }

    #[test]
    fn bulk_delete_leaves_the_rest() {
        let mut collection = mem_collection();
        let cards: Vec<Card> = (0..5)
            .map(|i| add(&mut collection, &format!("Sender {}", i), "Birthday"))
            .collect();

        collection.enter_selection_mode(Some(cards[0].id()));
        collection.toggle_card_selection(cards[2].id());
        collection.toggle_card_selection(cards[4].id());
        assert_eq!(collection.selection().count(), 3);

        let outcome = collection.delete_selected_cards();
        assert!(outcome.is_success());
        assert_eq!(outcome.succeeded.len(), 3);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.store().fetch_all_cards().unwrap().len(), 2);
        assert!(!collection.is_selecting());
        assert!(collection.selection().is_empty());
    }

    #[test]
    fn bulk_favorite_applies_to_visible_selection() {
        let mut collection = mem_collection();
        add(&mut collection, "Mom", "Birthday");
        add(&mut collection, "Dad", "Holiday");
        add(&mut collection, "Grandma", "Birthday");

        collection.set_occasion_filter(Some("Birthday".to_string()));
        collection.enter_selection_mode(None);
        collection.select_all_cards();
        assert_eq!(collection.selection().count(), 2);

        let outcome = collection.favorite_selected_cards();
        assert_eq!(outcome.succeeded.len(), 2);
        assert!(!collection.is_selecting());

        collection.set_occasion_filter(None);
        collection.set_sort_option(SortOption::Favorites);
        assert_eq!(collection.sorted_cards().len(), 2);

        collection.enter_selection_mode(None);
        collection.select_all_cards();
        let outcome = collection.unfavorite_selected_cards();
        assert_eq!(outcome.succeeded.len(), 2);
        assert!(collection.sorted_cards().is_empty());
        assert!(collection
            .store()
            .fetch_all_cards()
            .unwrap()
            .iter()
            .all(|card| !card.is_favorite));
    }

    #[test]
    fn bulk_favorite_reports_per_card_failures() {
        let mut collection = mem_collection();
        add(&mut collection, "Mom", "Birthday");
        add(&mut collection, "Dad", "Holiday");
        collection.enter_selection_mode(None);
        collection.select_all_cards();
        collection.store().backend().set_simulate_write_error(true);

        let outcome = collection.favorite_selected_cards();
        assert_eq!(outcome.failed.len(), 2);
        assert!(collection.all_cards().iter().all(|card| !card.is_favorite));
        assert!(!collection.is_selecting());
    }

    #[test]
    fn deleting_a_selected_card_drops_it_from_the_selection() {
        let mut collection = mem_collection();
        let a = add(&mut collection, "Mom", "Birthday");
        let b = add(&mut collection, "Dad", "Holiday");
        collection.enter_selection_mode(Some(a.id()));
        collection.toggle_card_selection(b.id());

        collection.delete_card(&a.id()).unwrap();
        assert!(collection.is_selecting());
        assert!(!collection.selection().contains(&a.id()));
        assert_eq!(collection.selection().count(), 1);
    }

    #[test]
    fn clear_all_data_resets_everything() {
        let mut collection = mem_collection();
        let card = add(&mut collection, "Mom", "Birthday");
        collection.enter_selection_mode(Some(card.id()));

        collection.clear_all_data().unwrap();
        assert!(collection.is_empty());
        assert!(!collection.is_selecting());
        assert_eq!(collection.store().images().file_count(), 0);
    }

    #[test]
    fn resolve_uses_newest_first_listing() {
        let mut collection = mem_collection();
        let older = add(&mut collection, "Mom", "Birthday");
        let newer = add(&mut collection, "Dad", "Holiday");
        collection.set_sort_option(SortOption::Oldest);

        let ids = collection
            .resolve(&[CardSelector::Index(1), CardSelector::Index(2)])
            .unwrap();
        assert_eq!(ids, vec![newer.id(), older.id()]);
    }
}
