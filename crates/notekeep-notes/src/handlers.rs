//! Bus handlers answered by the notes module.
//!
//! | Request | Payload | Reply |
//! |---------|---------|-------|
//! | `restore` | `{ "model": Note }` | restored `Note` |
//! | `changeNotebookId` | `{ "model": Notebook, "removeNotes"?: bool }` | `{ "updated": n }` |
//!
//! Handlers hold a weak reference to the module, so a registered handler
//! never keeps a dropped module alive.

use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use notekeep_core::defaults::{REQUEST_CHANGE_NOTEBOOK_ID, REQUEST_RESTORE};
use notekeep_core::{handler_fn, Error, Note, Notebook, Result};

use crate::module::NotesModule;
use crate::options::ChangeNotebookOptions;

/// `restore` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreRequest {
    pub model: Note,
}

/// `changeNotebookId` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotebookIdRequest {
    pub model: Notebook,
    #[serde(default)]
    pub remove_notes: bool,
}

/// `changeNotebookId` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotebookIdReply {
    pub updated: usize,
}

fn upgrade(module: &Weak<NotesModule>) -> Result<Arc<NotesModule>> {
    module
        .upgrade()
        .ok_or_else(|| Error::Internal("notes module dropped while still replying".to_string()))
}

async fn handle_restore(module: Weak<NotesModule>, payload: JsonValue) -> Result<JsonValue> {
    let request: RestoreRequest = serde_json::from_value(payload)?;
    let restored = upgrade(&module)?.restore(request.model).await?;
    Ok(serde_json::to_value(restored)?)
}

async fn handle_change_notebook_id(
    module: Weak<NotesModule>,
    payload: JsonValue,
) -> Result<JsonValue> {
    let request: ChangeNotebookIdRequest = serde_json::from_value(payload)?;
    let options = ChangeNotebookOptions {
        remove_notes: request.remove_notes,
    };
    let updated = upgrade(&module)?
        .change_notebook_id(&request.model, options)
        .await?;
    Ok(serde_json::to_value(ChangeNotebookIdReply {
        updated: updated.len(),
    })?)
}

impl NotesModule {
    /// Start answering `restore` and `changeNotebookId` on the module channel.
    ///
    /// Fails with [`Error::HandlerConflict`] if another module already
    /// answers either request; nothing stays registered in that case.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        let channel = self.config.channel.as_str();

        let weak = Arc::downgrade(self);
        self.router
            .reply(
                channel,
                REQUEST_RESTORE,
                handler_fn(move |payload| handle_restore(weak.clone(), payload)),
            )
            .await?;

        let weak = Arc::downgrade(self);
        let registered = self
            .router
            .reply(
                channel,
                REQUEST_CHANGE_NOTEBOOK_ID,
                handler_fn(move |payload| handle_change_notebook_id(weak.clone(), payload)),
            )
            .await;
        if let Err(err) = registered {
            warn!(channel, error = %err, "Could not register notes handlers, rolling back");
            self.router.stop_replying(channel, REQUEST_RESTORE).await;
            return Err(err);
        }

        info!(subsystem = "notes", channel, "Notes module replying");
        Ok(())
    }

    /// Stop answering bus requests. Safe to call when not started.
    pub async fn stop(&self) {
        let channel = self.config.channel.as_str();
        let restore = self.router.stop_replying(channel, REQUEST_RESTORE).await;
        let change = self
            .router
            .stop_replying(channel, REQUEST_CHANGE_NOTEBOOK_ID)
            .await;
        if restore || change {
            info!(subsystem = "notes", channel, "Notes module stopped replying");
        }
    }

    /// Whether both handlers are registered.
    pub async fn is_started(&self) -> bool {
        let channel = self.config.channel.as_str();
        self.router.is_replying(channel, REQUEST_RESTORE).await
            && self
                .router
                .is_replying(channel, REQUEST_CHANGE_NOTEBOOK_ID)
                .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_change_notebook_id_request_defaults() {
        let request: ChangeNotebookIdRequest = serde_json::from_value(json!({
            "model": {"id": "12", "profileId": "test", "name": "Work"}
        }))
        .unwrap();
        assert_eq!(request.model.id, "12");
        assert!(!request.remove_notes);

        let request: ChangeNotebookIdRequest = serde_json::from_value(json!({
            "model": {"id": "12", "profileId": "test", "name": "Work"},
            "removeNotes": true
        }))
        .unwrap();
        assert!(request.remove_notes);
    }

    #[tokio::test]
    async fn test_dropped_module_reports_internal_error() {
        let weak: Weak<NotesModule> = Weak::new();
        let err = handle_restore(weak, json!({"model": {"id": "1", "profileId": "test"}}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn test_malformed_payload_is_rejected() {
        let err = handle_change_notebook_id(Weak::new(), json!({"removeNotes": true}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
