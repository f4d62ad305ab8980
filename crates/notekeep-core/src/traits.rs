//! Core traits for notekeep abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::collection::NoteCollection;
use crate::error::Result;
use crate::models::Note;
use crate::note_filter::{NoteConditions, SortField};

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Primitive query against the notes collection of one profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteQuery {
    /// Partition to search. Notes of other profiles are never returned.
    pub profile_id: String,
    /// Equality conditions evaluated by the backend.
    pub conditions: NoteConditions,
    /// Order of the returned collection.
    pub sort_field: SortField,
}

impl NoteQuery {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Default::default()
        }
    }

    pub fn with_conditions(mut self, conditions: NoteConditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn with_sort_field(mut self, sort_field: SortField) -> Self {
        self.sort_field = sort_field;
        self
    }
}

/// Primitive persistence for notes.
///
/// Every call is scoped to a single profile and either fully succeeds or
/// fails without writing anything.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert or replace a note. Assigns an id when the note has none.
    async fn save(&self, note: Note) -> Result<Note>;

    /// Insert or replace several notes of one profile as a single write.
    async fn save_all(&self, profile_id: &str, notes: Vec<Note>) -> Result<Vec<Note>>;

    /// Fetch the notes matching the query, sorted by its sort field.
    async fn find(&self, query: NoteQuery) -> Result<NoteCollection>;

    /// Fetch one note by id.
    async fn find_model(&self, profile_id: &str, id: &str) -> Result<Note>;

    /// Permanently erase a note.
    async fn remove(&self, note: &Note) -> Result<()>;
}
