//! Selection of placed elements.
//!
//! Membership is keyed by [`ElementId`] only, so two elements with the same
//! glyph and position are still distinct. The set is session-local: it is
//! never persisted and never part of the undo history.

use crate::model::{DocumentModel, ElementId};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<ElementId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.ids.iter().copied()
    }

    /// Selected ids in ascending order.
    pub fn to_vec(&self) -> Vec<ElementId> {
        self.ids.iter().copied().collect()
    }

    pub fn insert(&mut self, id: ElementId) -> bool {
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: ElementId) -> bool {
        self.ids.remove(&id)
    }

    /// Flip membership, returning whether the id is selected afterwards.
    pub fn toggle(&mut self, id: ElementId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that no longer reference an element. Returns the number of
    /// ids removed.
    pub fn prune(&mut self, model: &DocumentModel) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| model.contains(*id));
        before - self.ids.len()
    }
}

impl FromIterator<ElementId> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = ElementId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
