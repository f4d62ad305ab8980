//! In-memory note repository.
//!
//! Notes live in one map per profile partition behind a single
//! `tokio::sync::RwLock`, so every primitive call is all-or-nothing: a batch
//! save validates the whole batch before touching the map.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, trace};
use uuid::Uuid;

use notekeep_core::{Error, Note, NoteCollection, NoteQuery, NoteRepository, Result};

type Partition = HashMap<String, Note>;

/// Profile-partitioned in-memory implementation of [`NoteRepository`].
#[derive(Default)]
pub struct MemoryNoteRepository {
    partitions: RwLock<HashMap<String, Partition>>,
}

impl MemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repository with existing notes (ids are kept as given).
    pub async fn with_notes(notes: impl IntoIterator<Item = Note>) -> Result<Self> {
        let repo = Self::new();
        for note in notes {
            repo.save(note).await?;
        }
        Ok(repo)
    }

    /// Number of notes stored for a profile.
    pub async fn count(&self, profile_id: &str) -> usize {
        self.partitions
            .read()
            .await
            .get(profile_id)
            .map_or(0, |partition| partition.len())
    }

    /// Validate a note for storage and give it an id when it has none.
    fn prepare(mut note: Note) -> Result<Note> {
        if note.profile_id.is_empty() {
            return Err(Error::InvalidInput(
                "note has no profile id".to_string(),
            ));
        }
        if note.is_new() {
            note.id = Uuid::now_v7().to_string();
        }
        note.strip_hydration();
        Ok(note)
    }
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn save(&self, note: Note) -> Result<Note> {
        let note = Self::prepare(note)?;
        let mut partitions = self.partitions.write().await;
        partitions
            .entry(note.profile_id.clone())
            .or_default()
            .insert(note.id.clone(), note.clone());
        trace!(profile_id = %note.profile_id, note_id = %note.id, "Saved note");
        Ok(note)
    }

    async fn save_all(&self, profile_id: &str, notes: Vec<Note>) -> Result<Vec<Note>> {
        let notes = notes
            .into_iter()
            .map(|note| {
                if note.profile_id != profile_id {
                    return Err(Error::InvalidInput(format!(
                        "note '{}' belongs to profile '{}', not '{}'",
                        note.id, note.profile_id, profile_id
                    )));
                }
                Self::prepare(note)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(profile_id.to_string()).or_default();
        for note in &notes {
            partition.insert(note.id.clone(), note.clone());
        }
        debug!(profile_id, result_count = notes.len(), "Saved note batch");
        Ok(notes)
    }

    async fn find(&self, query: NoteQuery) -> Result<NoteCollection> {
        let partitions = self.partitions.read().await;
        let mut collection: NoteCollection = partitions
            .get(&query.profile_id)
            .into_iter()
            .flat_map(|partition| partition.values())
            .filter(|note| query.conditions.matches(note))
            .cloned()
            .collect();
        drop(partitions);

        collection.sort_by_field(query.sort_field);
        debug!(
            profile_id = %query.profile_id,
            sort_field = %query.sort_field,
            result_count = collection.len(),
            "Found notes"
        );
        Ok(collection)
    }

    async fn find_model(&self, profile_id: &str, id: &str) -> Result<Note> {
        self.partitions
            .read()
            .await
            .get(profile_id)
            .and_then(|partition| partition.get(id))
            .cloned()
            .ok_or_else(|| Error::note_not_found(profile_id, id))
    }

    async fn remove(&self, note: &Note) -> Result<()> {
        let mut partitions = self.partitions.write().await;
        partitions
            .get_mut(&note.profile_id)
            .and_then(|partition| partition.remove(&note.id))
            .ok_or_else(|| Error::note_not_found(&note.profile_id, &note.id))?;
        debug!(profile_id = %note.profile_id, note_id = %note.id, "Erased note");
        Ok(())
    }
}
