//! Multi-select state for bulk actions.
//!
//! Two modes: `Browsing` (no selection possible) and `Selecting`. Leaving
//! `Selecting`, explicitly or through a bulk action, always empties the set.

use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Browsing,
    Selecting,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: SelectionMode,
    selected: HashSet<Uuid>,
}

impl Selection {
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_selecting(&self) -> bool {
        self.mode == SelectionMode::Selecting
    }

    pub fn contains(&self, id: &Uuid) -> bool {
        self.selected.contains(id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn enter(&mut self, preselect: Option<Uuid>) {
        self.mode = SelectionMode::Selecting;
        if let Some(id) = preselect {
            self.selected.insert(id);
        }
    }

    /// Flips `id`. Returns whether it is selected afterwards.
    /// Ignored while browsing.
    pub fn toggle(&mut self, id: Uuid) -> bool {
        if !self.is_selecting() {
            return false;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
            return true;
        }
        false
    }

    pub fn select_all(&mut self, ids: impl IntoIterator<Item = Uuid>) {
        if self.is_selecting() {
            self.selected.extend(ids);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn exit(&mut self) {
        self.mode = SelectionMode::Browsing;
        self.selected.clear();
    }

    /// Drops a card that no longer exists.
    pub(crate) fn forget(&mut self, id: &Uuid) {
        self.selected.remove(id);
    }
}
