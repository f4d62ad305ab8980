//! # notekeep-notes
//!
//! Coordination layer for the notes collection.
//!
//! [`NotesModule`] sits on top of a primitive [`NoteRepository`] and the
//! [`Router`] shared with the other entity modules. It owns the rules that
//! span several entities:
//!
//! - two-stage deletion (trash, then erase) with `destroy:model` /
//!   `restore:model` events
//! - cascading a notebook removal onto its notes
//! - tag synchronization through the tags module
//! - sorted, filtered listing using the user's sort preference
//! - concurrent notebook/files hydration
//!
//! Once started, the module also answers `restore` and `changeNotebookId`
//! requests on its channel (see [`handlers`]).
//!
//! Structured log fields follow the schema in [`notekeep_core::logging`].
//!
//! [`NoteRepository`]: notekeep_core::NoteRepository
//! [`Router`]: notekeep_core::Router

pub mod collaborators;
pub mod config;
pub mod handlers;
pub mod module;
pub mod options;

pub use collaborators::Collaborators;
pub use config::NotesConfig;
pub use handlers::{ChangeNotebookIdReply, ChangeNotebookIdRequest, RestoreRequest};
pub use module::NotesModule;
pub use options::{
    ChangeNotebookOptions, FindModelOptions, FindOptions, FindOrFetchOptions, RemoveOutcome,
    SaveOptions, SaveOutcome,
};
