//! Centralized default constants for notekeep.
//!
//! Channel and request names form the bus contract between the notes module
//! and its collaborators; keep them here rather than scattering literals.

// =============================================================================
// CHANNELS
// =============================================================================

/// Channel answered by the notes module.
pub const NOTES_CHANNEL: &str = "collections/Notes";

/// Channel answered by the tags module.
pub const TAGS_CHANNEL: &str = "collections/Tags";

/// Channel answered by the notebooks module.
pub const NOTEBOOKS_CHANNEL: &str = "collections/Notebooks";

/// Channel answered by the files module.
pub const FILES_CHANNEL: &str = "collections/Files";

/// Channel answered by the configs module.
pub const CONFIGS_CHANNEL: &str = "collections/Configs";

// =============================================================================
// REQUESTS
// =============================================================================

/// Notes: restore a note out of the trash.
pub const REQUEST_RESTORE: &str = "restore";

/// Notes: detach (and optionally trash) every note of a notebook.
pub const REQUEST_CHANGE_NOTEBOOK_ID: &str = "changeNotebookId";

/// Tags: make sure the given tags exist.
pub const REQUEST_ADD_TAGS: &str = "addTags";

/// Notebooks: fetch one notebook.
pub const REQUEST_FIND_MODEL: &str = "findModel";

/// Files: fetch several files by id.
pub const REQUEST_FIND_FILES: &str = "findFiles";

/// Configs: read one config value.
pub const REQUEST_FIND_CONFIG: &str = "findConfig";

// =============================================================================
// EVENTS
// =============================================================================

/// Emitted after a note moved to the trash.
pub const EVENT_DESTROY_MODEL: &str = "destroy:model";

/// Emitted after a note was restored from the trash.
pub const EVENT_RESTORE_MODEL: &str = "restore:model";

/// Default event bus broadcast channel capacity.
pub const EVENT_BUS_CAPACITY: usize = 256;

// =============================================================================
// SORTING
// =============================================================================

/// Config key holding the user's note sort preference.
pub const SORT_CONFIG_KEY: &str = "sortnotes";

/// Sort field used when the config is missing or unreadable.
pub const SORT_FIELD: &str = "created";
