//! # notekeep-store
//!
//! Storage backends for the notekeep notes collection.
//!
//! This crate provides:
//! - [`MemoryNoteRepository`]: profile-partitioned, in-process storage used
//!   by the offline client and by tests
//! - [`MockNoteRepository`]: a recording wrapper with failure injection
//!
//! ## Example
//!
//! ```rust,ignore
//! use notekeep_core::{Note, NoteRepository};
//! use notekeep_store::MemoryNoteRepository;
//!
//! let repo = MemoryNoteRepository::new();
//! let note = repo.save(Note::new("default").with_title("Hello")).await?;
//! ```

pub mod memory;
pub mod mock;

pub use memory::MemoryNoteRepository;
pub use mock::{MockNoteRepository, RepoCall, RepoOp};
