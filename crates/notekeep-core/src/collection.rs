//! Ordered note collections returned by queries.

use serde::{Deserialize, Serialize};

use crate::models::{Note, NotePatch};
use crate::note_filter::{NoteFilter, SortField};

/// An ordered set of notes from a single profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteCollection {
    notes: Vec<Note>,
}

impl NoteCollection {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.notes.iter().map(|n| n.id.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Note> {
        self.notes
    }

    /// Sort in place by the user's sort preference.
    pub fn sort_by_field(&mut self, field: SortField) {
        self.notes.sort_by(|a, b| field.compare(a, b));
    }

    /// Keep only the notes the named filter accepts. Order is preserved.
    pub fn filter_list(&mut self, filter: &NoteFilter) {
        self.notes.retain(|note| filter.matches(note));
    }

    /// Apply the same override to every note.
    pub fn apply_patch(&mut self, patch: &NotePatch) {
        for note in &mut self.notes {
            patch.apply(note);
        }
    }
}

impl From<Vec<Note>> for NoteCollection {
    fn from(notes: Vec<Note>) -> Self {
        Self::new(notes)
    }
}

impl IntoIterator for NoteCollection {
    type Item = Note;
    type IntoIter = std::vec::IntoIter<Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.into_iter()
    }
}

impl<'a> IntoIterator for &'a NoteCollection {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

impl FromIterator<Note> for NoteCollection {
    fn from_iter<T: IntoIterator<Item = Note>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
