//! Shared setup for notes module integration tests.
//!
//! Builds a router, a recording repository and a [`NotesModule`], and offers
//! stubs for the collaborating modules (tags, notebooks, files, configs).

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

use notekeep_core::{handler_fn, Error, EventEnvelope, Note, Result, Router};
use notekeep_notes::{NotesConfig, NotesModule};
use notekeep_store::MockNoteRepository;

pub const PROFILE: &str = "test";

static TRACING: Once = Once::new();

/// Route module logs to the test writer. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Payloads received by a stubbed collaborator.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<JsonValue>>>);

impl Recorder {
    pub fn payloads(&self) -> Vec<JsonValue> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn push(&self, payload: JsonValue) {
        self.0.lock().unwrap().push(payload);
    }
}

pub struct Harness {
    pub router: Arc<Router>,
    pub repo: MockNoteRepository,
    pub module: Arc<NotesModule>,
    pub config: NotesConfig,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_notes(Vec::new()).await
    }

    pub async fn with_notes(notes: Vec<Note>) -> Self {
        let repo = MockNoteRepository::with_notes(notes).await.unwrap();
        Self::with_repo(repo)
    }

    pub fn with_repo(repo: MockNoteRepository) -> Self {
        init_tracing();
        let config = NotesConfig::default();
        let router = Arc::new(Router::with_event_capacity(config.event_bus_capacity));
        let module = Arc::new(NotesModule::new(
            Arc::new(repo.clone()),
            router.clone(),
            config.clone(),
        ));
        Self {
            router,
            repo,
            module,
            config,
        }
    }

    /// Answer `request` on `channel` with `reply`, recording every payload.
    pub async fn stub(&self, channel: &str, request: &str, reply: JsonValue) -> Recorder {
        self.stub_with(channel, request, move |_| Ok(reply.clone()))
            .await
    }

    /// Answer `request` on `channel` with an error.
    pub async fn stub_failing(&self, channel: &str, request: &str, message: &str) -> Recorder {
        let message = message.to_string();
        self.stub_with(channel, request, move |_| Err(Error::Internal(message.clone())))
            .await
    }

    /// Answer `request` on `channel` with a reply computed from the payload.
    pub async fn stub_with<F>(&self, channel: &str, request: &str, reply: F) -> Recorder
    where
        F: Fn(&JsonValue) -> Result<JsonValue> + Send + Sync + 'static,
    {
        let recorder = Recorder::default();
        let seen = recorder.clone();
        let reply = Arc::new(reply);
        self.router
            .reply(
                channel,
                request,
                handler_fn(move |payload| {
                    let seen = seen.clone();
                    let reply = reply.clone();
                    async move {
                        let result = reply(&payload);
                        seen.push(payload);
                        result
                    }
                }),
            )
            .await
            .unwrap();
        recorder
    }

    pub async fn stub_tags(&self) -> Recorder {
        self.stub(&self.config.tags_channel, "addTags", JsonValue::Null)
            .await
    }

    pub async fn stub_sort(&self, value: JsonValue) -> Recorder {
        self.stub(&self.config.configs_channel, "findConfig", value)
            .await
    }

    /// Drain every event published so far.
    pub fn drain(rx: &mut tokio::sync::broadcast::Receiver<EventEnvelope>) -> Vec<EventEnvelope> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }
}

/// A note with fixed timestamps so sort order is deterministic.
pub fn note(id: &str, created: i64) -> Note {
    let mut note = Note::new(PROFILE).with_id(id).with_title(format!("Note {id}"));
    note.created = created;
    note.updated = created;
    note
}
