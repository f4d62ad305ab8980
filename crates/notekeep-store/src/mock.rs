//! Recording note repository for deterministic testing.
//!
//! Wraps a [`MemoryNoteRepository`], logs every primitive call and can be
//! told to fail specific operations or to delay them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let repo = MockNoteRepository::new().with_failure(RepoOp::SaveAll);
//! // ... drive the notes module ...
//! assert_eq!(repo.call_count(RepoOp::Find), 1);
//! ```

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use notekeep_core::{Error, Note, NoteCollection, NoteQuery, NoteRepository, Result};

use crate::memory::MemoryNoteRepository;

/// Primitive operation kinds, used for counting and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOp {
    Save,
    SaveAll,
    Find,
    FindModel,
    Remove,
}

/// One recorded primitive call with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    Save(Note),
    SaveAll { profile_id: String, notes: Vec<Note> },
    Find(NoteQuery),
    FindModel { profile_id: String, id: String },
    Remove(Note),
}

impl RepoCall {
    pub fn op(&self) -> RepoOp {
        match self {
            RepoCall::Save(_) => RepoOp::Save,
            RepoCall::SaveAll { .. } => RepoOp::SaveAll,
            RepoCall::Find(_) => RepoOp::Find,
            RepoCall::FindModel { .. } => RepoOp::FindModel,
            RepoCall::Remove(_) => RepoOp::Remove,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MockConfig {
    failing: HashSet<RepoOp>,
    latency_ms: u64,
}

/// Mock repository for testing.
#[derive(Clone)]
pub struct MockNoteRepository {
    inner: Arc<MemoryNoteRepository>,
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<RepoCall>>>,
}

impl MockNoteRepository {
    /// Create an empty mock repository.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryNoteRepository::new()),
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock repository pre-filled with notes. Seeding is not logged.
    pub async fn with_notes(notes: impl IntoIterator<Item = Note>) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(MemoryNoteRepository::with_notes(notes).await?),
            ..Self::new()
        })
    }

    /// Make every call of `op` fail with a storage error.
    pub fn with_failure(mut self, op: RepoOp) -> Self {
        Arc::make_mut(&mut self.config).failing.insert(op);
        self
    }

    /// Delay every call by the given latency.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        Arc::make_mut(&mut self.config).latency_ms = latency_ms;
        self
    }

    /// The backing store, for assertions on persisted state.
    pub fn store(&self) -> &MemoryNoteRepository {
        &self.inner
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<RepoCall> {
        self.log().clone()
    }

    /// Number of logged calls of one kind.
    pub fn call_count(&self, op: RepoOp) -> usize {
        self.log().iter().filter(|c| c.op() == op).count()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.log().clear()
    }

    fn log(&self) -> MutexGuard<'_, Vec<RepoCall>> {
        self.call_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, call: RepoCall) -> Result<()> {
        let op = call.op();
        self.log().push(call);
        if self.config.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;
        }
        if self.config.failing.contains(&op) {
            return Err(Error::Storage(format!("mock failure on {op:?}")));
        }
        Ok(())
    }
}

impl Default for MockNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn save(&self, note: Note) -> Result<Note> {
        self.record(RepoCall::Save(note.clone())).await?;
        self.inner.save(note).await
    }

    async fn save_all(&self, profile_id: &str, notes: Vec<Note>) -> Result<Vec<Note>> {
        self.record(RepoCall::SaveAll {
            profile_id: profile_id.to_string(),
            notes: notes.clone(),
        })
        .await?;
        self.inner.save_all(profile_id, notes).await
    }

    async fn find(&self, query: NoteQuery) -> Result<NoteCollection> {
        self.record(RepoCall::Find(query.clone())).await?;
        self.inner.find(query).await
    }

    async fn find_model(&self, profile_id: &str, id: &str) -> Result<Note> {
        self.record(RepoCall::FindModel {
            profile_id: profile_id.to_string(),
            id: id.to_string(),
        })
        .await?;
        self.inner.find_model(profile_id, id).await
    }

    async fn remove(&self, note: &Note) -> Result<()> {
        self.record(RepoCall::Remove(note.clone())).await?;
        self.inner.remove(note).await
    }
}
