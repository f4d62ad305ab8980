//! Typed client for the modules the notes module depends on.
//!
//! Tags, notebooks, files and configs are owned by other modules and only
//! reachable through the router. This client builds their request payloads
//! and decodes their replies.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::trace;

use notekeep_core::defaults::{
    REQUEST_ADD_TAGS, REQUEST_FIND_CONFIG, REQUEST_FIND_FILES, REQUEST_FIND_MODEL,
};
use notekeep_core::{FileAttachment, Notebook, Result, Router};

use crate::config::NotesConfig;

/// `addTags` payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTagsRequest<'a> {
    pub tags: &'a [String],
    pub profile_id: &'a str,
}

/// Notebooks `findModel` payload. `id` is `null` for notes without notebook.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindNotebookRequest<'a> {
    pub profile_id: &'a str,
    pub id: Option<&'a str>,
}

/// `findFiles` payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindFilesRequest<'a> {
    pub profile_id: &'a str,
    pub ids: &'a [String],
}

/// `findConfig` payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindConfigRequest<'a> {
    pub name: &'a str,
    pub profile_id: &'a str,
}

/// Request-reply client for the tags, notebooks, files and configs modules.
#[derive(Clone)]
pub struct Collaborators {
    router: Arc<Router>,
    config: NotesConfig,
}

impl Collaborators {
    pub fn new(router: Arc<Router>, config: NotesConfig) -> Self {
        Self { router, config }
    }

    /// Ask the tags module to create any of `tags` that do not exist yet.
    pub async fn add_tags(&self, profile_id: &str, tags: &[String]) -> Result<()> {
        trace!(profile_id, tag_count = tags.len(), "Requesting addTags");
        let _ack: JsonValue = self
            .router
            .request_as(
                &self.config.tags_channel,
                REQUEST_ADD_TAGS,
                &AddTagsRequest { tags, profile_id },
            )
            .await?;
        Ok(())
    }

    /// Resolve a notebook. `Ok(None)` when the notebooks module has none.
    pub async fn find_notebook(&self, profile_id: &str, id: Option<&str>) -> Result<Option<Notebook>> {
        self.router
            .request_as(
                &self.config.notebooks_channel,
                REQUEST_FIND_MODEL,
                &FindNotebookRequest { profile_id, id },
            )
            .await
    }

    /// Resolve file attachments by id.
    pub async fn find_files(&self, profile_id: &str, ids: &[String]) -> Result<Vec<FileAttachment>> {
        self.router
            .request_as(
                &self.config.files_channel,
                REQUEST_FIND_FILES,
                &FindFilesRequest { profile_id, ids },
            )
            .await
    }

    /// Read a config value. `Ok(None)` when it is unset.
    pub async fn find_config(&self, profile_id: &str, name: &str) -> Result<Option<String>> {
        self.router
            .request_as(
                &self.config.configs_channel,
                REQUEST_FIND_CONFIG,
                &FindConfigRequest { name, profile_id },
            )
            .await
    }
}
