//! Entity types shared by the notes module, its storage and its collaborators.
//!
//! Field names on the wire follow the bus contract (`profileId`,
//! `notebookId`, `isFavorite`, ...), hence `rename_all = "camelCase"`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

// =============================================================================
// TRASH STATE
// =============================================================================

/// Soft-delete lifecycle of a note.
///
/// Stored as an integer: `0` is active, `1` is in the trash. Any other value
/// is kept as [`TrashState::Unknown`] so it round-trips untouched; it counts
/// as "not active" but is not the trash state either. Restoring a note always
/// normalizes it back to [`TrashState::Active`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TrashState {
    #[default]
    Active,
    Trashed,
    Unknown(i64),
}

impl TrashState {
    /// Integer code used on the wire and in storage.
    pub fn code(self) -> i64 {
        match self {
            TrashState::Active => 0,
            TrashState::Trashed => 1,
            TrashState::Unknown(code) => code,
        }
    }

    pub fn is_active(self) -> bool {
        self == TrashState::Active
    }

    pub fn is_trashed(self) -> bool {
        self == TrashState::Trashed
    }
}

impl From<i64> for TrashState {
    fn from(code: i64) -> Self {
        match code {
            0 => TrashState::Active,
            1 => TrashState::Trashed,
            other => TrashState::Unknown(other),
        }
    }
}

impl From<i32> for TrashState {
    fn from(code: i32) -> Self {
        TrashState::from(i64::from(code))
    }
}

impl From<TrashState> for i64 {
    fn from(state: TrashState) -> Self {
        state.code()
    }
}

// =============================================================================
// NOTEBOOK REFERENCES
// =============================================================================

/// Normalize a notebook reference: `""` and `"0"` mean "no notebook".
pub fn normalize_notebook_id(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty() && id != "0")
}

/// Serde adapter for notebook references.
///
/// Accepts `null`, `0`, `"0"`, `""` (all meaning "no notebook"), strings and
/// non-zero numbers. Serializes "no notebook" back as `0`.
mod notebook_ref {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(id) => s.serialize_str(id),
            None => s.serialize_u8(0),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let raw = Option::<Value>::deserialize(d)?;
        let id = match raw {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "invalid notebook reference: {other}"
                )))
            }
        };
        Ok(super::normalize_notebook_id(id))
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A note, scoped to one profile partition.
///
/// `notebook` and `file_models` are hydration fields: they are filled by an
/// attachment lookup, never persisted and never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Empty until the repository assigns an id on first save.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, with = "notebook_ref")]
    pub notebook_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ids of attached files.
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub trash: TrashState,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub task_all: u32,
    #[serde(default)]
    pub task_completed: u32,
    /// Creation time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub created: i64,
    /// Last save time, milliseconds since the Unix epoch.
    #[serde(default)]
    pub updated: i64,

    #[serde(skip)]
    pub notebook: Option<Notebook>,
    #[serde(skip)]
    pub file_models: Option<Vec<FileAttachment>>,
}

impl Note {
    /// Create an empty, unsaved note in the given profile.
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_notebook(mut self, notebook_id: impl Into<String>) -> Self {
        self.notebook_id = normalize_notebook_id(Some(notebook_id.into()));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_trash(mut self, trash: impl Into<TrashState>) -> Self {
        self.trash = trash.into();
        self
    }

    pub fn with_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    pub fn with_tasks(mut self, task_all: u32, task_completed: u32) -> Self {
        self.task_all = task_all;
        self.task_completed = task_completed;
        self
    }

    /// Whether the note has never been persisted.
    pub fn is_new(&self) -> bool {
        self.id.is_empty()
    }

    /// Whether the note has been hydrated by an attachment lookup.
    pub fn is_hydrated(&self) -> bool {
        self.notebook.is_some() && self.file_models.is_some()
    }

    /// Refresh the `updated` timestamp (and `created` on first save).
    pub fn touch(&mut self) {
        let now = Utc::now().timestamp_millis();
        if self.created == 0 {
            self.created = now;
        }
        self.updated = now;
    }

    /// Drop hydration fields, e.g. before handing the note to storage.
    pub fn strip_hydration(&mut self) {
        self.notebook = None;
        self.file_models = None;
    }
}

// =============================================================================
// NOTE PATCH
// =============================================================================

/// Override applied to a note right before it is saved.
///
/// Only the fields that are set change. `notebook_id: Some(None)` detaches the
/// note from its notebook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub notebook_id: Option<Option<String>>,
    pub trash: Option<TrashState>,
    pub is_favorite: Option<bool>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trash(mut self, trash: TrashState) -> Self {
        self.trash = Some(trash);
        self
    }

    pub fn detach_notebook(mut self) -> Self {
        self.notebook_id = Some(None);
        self
    }

    pub fn notebook(mut self, notebook_id: impl Into<String>) -> Self {
        self.notebook_id = Some(normalize_notebook_id(Some(notebook_id.into())));
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Write every set field into `note`.
    pub fn apply(&self, note: &mut Note) {
        if let Some(notebook_id) = &self.notebook_id {
            note.notebook_id = notebook_id.clone();
        }
        if let Some(trash) = self.trash {
            note.trash = trash;
        }
        if let Some(is_favorite) = self.is_favorite {
            note.is_favorite = is_favorite;
        }
        if let Some(tags) = &self.tags {
            note.tags = tags.clone();
        }
    }
}

// =============================================================================
// COLLABORATOR ENTITIES
// =============================================================================

/// A notebook, owned by the notebooks module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notebook {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub name: String,
    /// Parent notebook for nested hierarchies (None = root)
    #[serde(default, with = "notebook_ref")]
    pub parent_id: Option<String>,
    /// Number of notes in this notebook (computed by its owner)
    #[serde(default)]
    pub count: u32,
}

impl Notebook {
    pub fn new(
        profile_id: impl Into<String>,
        id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            profile_id: profile_id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Stand-in used when a note has no resolvable notebook.
    pub fn placeholder(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            ..Default::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_empty()
    }
}

/// A file attachment, owned by the files module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: String,
    #[serde(default)]
    pub profile_id: String,
    #[serde(default)]
    pub name: String,
    /// MIME type
    #[serde(default)]
    pub file_type: String,
    /// Data URL or local path of the content
    #[serde(default)]
    pub src: String,
}
