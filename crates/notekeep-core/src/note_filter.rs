//! Query conditions, named list filters and sort preferences for notes.
//!
//! Two levels of narrowing exist:
//! - [`NoteConditions`]: equality conditions evaluated by the repository
//!   while fetching (e.g. "every note of notebook X").
//! - [`NoteFilter`]: a named, client-side pass over an already fetched
//!   collection, selected by UI routes ("favorite", "tag", "search", ...).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Note, TrashState};

// =============================================================================
// CONDITIONS
// =============================================================================

/// Equality conditions for a repository query. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteConditions {
    /// `Some(None)` selects notes without a notebook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notebook_id: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trash: Option<TrashState>,
}

impl NoteConditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_notebook(mut self, notebook_id: impl Into<String>) -> Self {
        self.notebook_id = Some(Some(notebook_id.into()));
        self
    }

    pub fn with_trash(mut self, trash: TrashState) -> Self {
        self.trash = Some(trash);
        self
    }

    pub fn matches(&self, note: &Note) -> bool {
        if let Some(notebook_id) = &self.notebook_id {
            if &note.notebook_id != notebook_id {
                return false;
            }
        }
        if let Some(trash) = self.trash {
            if note.trash != trash {
                return false;
            }
        }
        true
    }
}

// =============================================================================
// SORT FIELD
// =============================================================================

/// Field the user chose to sort note lists by.
///
/// Favorites always come first; within each group timestamps and ids sort
/// newest/greatest first, titles alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Created,
    Updated,
    Title,
    Id,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Created => "created",
            SortField::Updated => "updated",
            SortField::Title => "title",
            SortField::Id => "id",
        }
    }

    /// Ordering of two notes in a sorted list.
    pub fn compare(self, a: &Note, b: &Note) -> Ordering {
        let by_field = match self {
            SortField::Created => b.created.cmp(&a.created),
            SortField::Updated => b.updated.cmp(&a.updated),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Id => b.id.cmp(&a.id),
        };
        b.is_favorite
            .cmp(&a.is_favorite)
            .then(by_field)
            .then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "created" => Ok(SortField::Created),
            "updated" => Ok(SortField::Updated),
            "title" => Ok(SortField::Title),
            "id" => Ok(SortField::Id),
            other => Err(Error::InvalidInput(format!("unknown sort field: {other}"))),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// NAMED FILTERS
// =============================================================================

/// Named filter applied to a fetched note collection.
///
/// Every filter except [`NoteFilter::Trashed`] only keeps active notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "filter", content = "query", rename_all = "lowercase")]
pub enum NoteFilter {
    Active,
    Favorite,
    /// Anything that is not active, including unknown trash states.
    Trashed,
    /// Notes with at least one task.
    Task,
    Notebook(String),
    Tag(String),
    /// Case-insensitive substring search over title and content.
    Search(String),
}

impl NoteFilter {
    /// Resolve a filter by name, with the query some filters require.
    pub fn parse(name: &str, query: Option<&str>) -> Result<Self> {
        let required = |what: &str| {
            query
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidInput(format!("filter '{name}' needs a {what}")))
        };
        match name {
            "active" => Ok(NoteFilter::Active),
            "favorite" => Ok(NoteFilter::Favorite),
            "trashed" => Ok(NoteFilter::Trashed),
            "task" => Ok(NoteFilter::Task),
            "notebook" => Ok(NoteFilter::Notebook(required("notebook id")?)),
            "tag" => Ok(NoteFilter::Tag(required("tag name")?)),
            "search" => Ok(NoteFilter::Search(required("search text")?)),
            other => Err(Error::InvalidInput(format!("unknown note filter: {other}"))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NoteFilter::Active => "active",
            NoteFilter::Favorite => "favorite",
            NoteFilter::Trashed => "trashed",
            NoteFilter::Task => "task",
            NoteFilter::Notebook(_) => "notebook",
            NoteFilter::Tag(_) => "tag",
            NoteFilter::Search(_) => "search",
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        if let NoteFilter::Trashed = self {
            return !note.trash.is_active();
        }
        if !note.trash.is_active() {
            return false;
        }
        match self {
            NoteFilter::Active | NoteFilter::Trashed => true,
            NoteFilter::Favorite => note.is_favorite,
            NoteFilter::Task => note.task_all > 0,
            NoteFilter::Notebook(id) => note.notebook_id.as_deref() == Some(id.as_str()),
            NoteFilter::Tag(tag) => note.tags.iter().any(|t| t == tag),
            NoteFilter::Search(text) => {
                let needle = text.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            }
        }
    }
}
