//! Error types for notekeep.

use thiserror::Error;

/// Result type alias using notekeep's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notekeep operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Primitive storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Note not found inside the given profile
    #[error("Note not found: {id} (profile {profile_id})")]
    NoteNotFound { profile_id: String, id: String },

    /// Nobody answers this request on the channel
    #[error("No handler for '{request}' on channel '{channel}'")]
    NoHandler { channel: String, request: String },

    /// A handler is already registered for this request on the channel
    #[error("Handler for '{request}' on channel '{channel}' is already registered")]
    HandlerConflict { channel: String, request: String },

    /// A collaborating module answered with a failure
    #[error("Request '{request}' on channel '{channel}' failed: {message}")]
    Collaborator {
        channel: String,
        request: String,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for [`Error::NoteNotFound`].
    pub fn note_not_found(profile_id: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NoteNotFound {
            profile_id: profile_id.into(),
            id: id.into(),
        }
    }

    /// Wrap any error returned by a collaborator's handler.
    ///
    /// Routing errors (`NoHandler`) are folded in as well: from the caller's
    /// side both mean the collaborator could not answer.
    pub fn collaborator(channel: &str, request: &str, source: Error) -> Self {
        match source {
            already @ Error::Collaborator { .. } => already,
            other => Error::Collaborator {
                channel: channel.to_string(),
                request: request.to_string(),
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
