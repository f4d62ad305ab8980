//! Option and outcome types for [`NotesModule`](crate::NotesModule) operations.

use notekeep_core::{Error, Note, NoteConditions, NoteFilter, NotePatch, Result};

/// Options for `save_model`.
#[derive(Debug, Clone, Default)]
pub struct SaveOptions {
    /// Ask the tags module to create the note's tags.
    pub save_tags: bool,
    /// Override applied before the note is persisted.
    pub data: NotePatch,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self) -> Self {
        self.save_tags = true;
        self
    }

    pub fn with_data(mut self, data: NotePatch) -> Self {
        self.data = data;
        self
    }
}

/// Result of `save_model`.
///
/// The note was persisted. When tag synchronization was requested and failed,
/// the failure is kept here instead of failing the save.
#[derive(Debug)]
pub struct SaveOutcome {
    pub saved: Note,
    pub tag_sync_error: Option<Error>,
}

impl SaveOutcome {
    /// Whether both the save and the requested tag sync succeeded.
    pub fn is_complete(&self) -> bool {
        self.tag_sync_error.is_none()
    }

    /// Treat a tag sync failure as a failure of the whole call.
    pub fn into_result(self) -> Result<Note> {
        match self.tag_sync_error {
            Some(err) => Err(err),
            None => Ok(self.saved),
        }
    }
}

/// Result of `remove`.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoveOutcome {
    /// The note was already in the trash and is now gone for good.
    Erased,
    /// The note moved to the trash.
    Trashed(Note),
    /// The note has no id; nothing was written.
    Unsaved,
}

/// Options for `change_notebook_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeNotebookOptions {
    /// Also move the notebook's notes to the trash.
    pub remove_notes: bool,
}

impl ChangeNotebookOptions {
    pub fn removing_notes() -> Self {
        Self { remove_notes: true }
    }
}

/// Options for `find`.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub profile_id: String,
    pub conditions: NoteConditions,
    /// Named filter applied after fetching.
    pub filter: Option<NoteFilter>,
}

impl FindOptions {
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

    pub fn with_filter(mut self, filter: NoteFilter) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Options for `find_model`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindModelOptions {
    pub id: String,
    pub profile_id: String,
    /// Also resolve the note's notebook and files.
    pub find_attachments: bool,
}

impl FindModelOptions {
    pub fn new(profile_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            profile_id: profile_id.into(),
            find_attachments: false,
        }
    }

    pub fn with_attachments(mut self) -> Self {
        self.find_attachments = true;
        self
    }
}

/// Options for `find_or_fetch`: an already loaded note, or how to load one.
#[derive(Debug, Clone, Default)]
pub struct FindOrFetchOptions {
    pub model: Option<Note>,
    pub lookup: FindModelOptions,
}

impl FindOrFetchOptions {
    pub fn loaded(model: Note) -> Self {
        Self {
            model: Some(model),
            lookup: FindModelOptions::default(),
        }
    }

    pub fn lookup(lookup: FindModelOptions) -> Self {
        Self {
            model: None,
            lookup,
        }
    }
}
