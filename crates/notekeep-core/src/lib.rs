//! # notekeep-core
//!
//! Core types, traits, and the message bus for notekeep.
//!
//! This crate provides the note model, query/filter types, the primitive
//! [`NoteRepository`] trait and the request-reply [`Router`] that entity
//! modules use to talk to each other.

pub mod collection;
pub mod defaults;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod note_filter;
pub mod router;
pub mod traits;

// Re-export commonly used types at crate root
pub use collection::NoteCollection;
pub use error::{Error, Result};
pub use events::{BusEvent, EventBus, EventEnvelope};
pub use models::*;
pub use note_filter::{NoteConditions, NoteFilter, SortField};
pub use router::{handler_fn, FnHandler, RequestHandler, Router};
pub use traits::*;
