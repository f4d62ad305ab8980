//! Request-reply router shared by entity modules.
//!
//! Requests are addressed by `(channel, request)`, e.g.
//! `("collections/Tags", "addTags")`. Exactly one handler answers a given
//! address; registering a second one fails with
//! [`Error::HandlerConflict`](crate::Error::HandlerConflict) and leaves the
//! first in place. Modules receive the router explicitly and must deregister
//! their handlers when they are decommissioned.
//!
//! The router also owns the [`EventBus`] modules publish their events on.
//!
//! Payloads are `serde_json::Value`s so modules stay decoupled from each
//! other's Rust types; [`Router::request_as`] adds typed (de)serialization.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, trace};

use crate::defaults;
use crate::error::{Error, Result};
use crate::events::{BusEvent, EventBus, EventEnvelope};

/// Answers one request on one channel.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, payload: JsonValue) -> Result<JsonValue>;
}

/// Adapter turning an async closure into a [`RequestHandler`].
pub struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> RequestHandler for FnHandler<F>
where
    F: Fn(JsonValue) -> Fut + Send + Sync,
    Fut: Future<Output = Result<JsonValue>> + Send + 'static,
{
    async fn handle(&self, payload: JsonValue) -> Result<JsonValue> {
        (self.0)(payload).await
    }
}

/// Build a handler from an async closure.
///
/// ```ignore
/// router
///     .reply("collections/Configs", "findConfig", handler_fn(|_| async { Ok(json!("title")) }))
///     .await?;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(JsonValue) -> Fut + Send + Sync,
    Fut: Future<Output = Result<JsonValue>> + Send + 'static,
{
    FnHandler(f)
}

#[derive(Clone)]
struct Registration {
    handler: Arc<dyn RequestHandler>,
    /// Removed after answering its first request.
    once: bool,
}

type Address = (String, String);

/// Process-local request-reply router plus event bus.
pub struct Router {
    handlers: RwLock<HashMap<Address, Registration>>,
    events: EventBus,
}

impl Router {
    /// Create a router with the default event bus capacity.
    pub fn new() -> Self {
        Self::with_event_capacity(defaults::EVENT_BUS_CAPACITY)
    }

    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            events: EventBus::new(capacity),
        }
    }

    /// Register the handler answering `request` on `channel`.
    pub async fn reply<H: RequestHandler + 'static>(
        &self,
        channel: &str,
        request: &str,
        handler: H,
    ) -> Result<()> {
        self.register(channel, request, Arc::new(handler), false)
            .await
    }

    /// Register a handler that answers a single request, then deregisters.
    pub async fn reply_once<H: RequestHandler + 'static>(
        &self,
        channel: &str,
        request: &str,
        handler: H,
    ) -> Result<()> {
        self.register(channel, request, Arc::new(handler), true)
            .await
    }

    async fn register(
        &self,
        channel: &str,
        request: &str,
        handler: Arc<dyn RequestHandler>,
        once: bool,
    ) -> Result<()> {
        let key = (channel.to_string(), request.to_string());
        let mut handlers = self.handlers.write().await;
        if handlers.contains_key(&key) {
            return Err(Error::HandlerConflict {
                channel: key.0,
                request: key.1,
            });
        }
        handlers.insert(key, Registration { handler, once });
        debug!(channel, request, once, "Registered request handler");
        Ok(())
    }

    /// Deregister one handler. Returns whether one was registered.
    pub async fn stop_replying(&self, channel: &str, request: &str) -> bool {
        let key = (channel.to_string(), request.to_string());
        let removed = self.handlers.write().await.remove(&key).is_some();
        debug!(channel, request, removed, "Deregistered request handler");
        removed
    }

    /// Whether a handler answers `request` on `channel`.
    pub async fn is_replying(&self, channel: &str, request: &str) -> bool {
        let key = (channel.to_string(), request.to_string());
        self.handlers.read().await.contains_key(&key)
    }

    /// Send a request and wait for its reply.
    ///
    /// The handler runs after the registry lock is released, so it may issue
    /// requests of its own. Handler failures come back as
    /// [`Error::Collaborator`](crate::Error::Collaborator).
    pub async fn request(
        &self,
        channel: &str,
        request: &str,
        payload: JsonValue,
    ) -> Result<JsonValue> {
        let key = (channel.to_string(), request.to_string());
        let no_handler = || Error::NoHandler {
            channel: channel.to_string(),
            request: request.to_string(),
        };

        let registration = self
            .handlers
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or_else(no_handler)?;

        if registration.once {
            let mut handlers = self.handlers.write().await;
            let still_ours = handlers
                .get(&key)
                .is_some_and(|r| Arc::ptr_eq(&r.handler, &registration.handler));
            if !still_ours {
                return Err(no_handler());
            }
            handlers.remove(&key);
        }

        trace!(channel, request, "Dispatching request");
        registration
            .handler
            .handle(payload)
            .await
            .map_err(|e| Error::collaborator(channel, request, e))
    }

    /// Typed variant of [`Router::request`].
    pub async fn request_as<Req, Resp>(
        &self,
        channel: &str,
        request: &str,
        payload: &Req,
    ) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)?;
        let reply = self.request(channel, request, payload).await?;
        serde_json::from_value(reply).map_err(|e| Error::Collaborator {
            channel: channel.to_string(),
            request: request.to_string(),
            message: format!("unexpected reply: {e}"),
        })
    }

    /// Publish an event on a channel.
    pub fn trigger(&self, channel: &str, event: BusEvent) {
        self.events.emit(channel, event);
    }

    /// Subscribe to events of every channel.
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn echo() -> FnHandler<impl Fn(JsonValue) -> std::future::Ready<Result<JsonValue>>> {
        handler_fn(|payload| std::future::ready(Ok(payload)))
    }

    #[tokio::test]
    async fn test_request_reaches_handler() {
        let router = Router::new();
        router.reply("c", "echo", echo()).await.unwrap();

        let reply = router.request("c", "echo", json!({"a": 1})).await.unwrap();
        assert_eq!(reply, json!({"a": 1}));
    }

    #[tokio::test]
    async fn test_request_without_handler() {
        let router = Router::new();
        let err = router.request("c", "missing", json!(null)).await.unwrap_err();
        assert!(matches!(err, Error::NoHandler { .. }));
    }

    #[tokio::test]
    async fn test_second_registration_conflicts() {
        let router = Router::new();
        router.reply("c", "echo", echo()).await.unwrap();

        let err = router
            .reply("c", "echo", handler_fn(|_| async { Ok(json!("other")) }))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HandlerConflict { .. }));

        // The first handler keeps answering.
        let reply = router.request("c", "echo", json!(1)).await.unwrap();
        assert_eq!(reply, json!(1));
    }

    #[tokio::test]
    async fn test_same_request_on_other_channel_is_independent() {
        let router = Router::new();
        router.reply("a", "findModel", echo()).await.unwrap();
        router.reply("b", "findModel", echo()).await.unwrap();
        assert!(router.is_replying("a", "findModel").await);
        assert!(router.is_replying("b", "findModel").await);
    }

    #[tokio::test]
    async fn test_reply_once_answers_a_single_request() {
        let router = Router::new();
        router.reply_once("c", "echo", echo()).await.unwrap();

        assert!(router.request("c", "echo", json!(1)).await.is_ok());
        assert!(matches!(
            router.request("c", "echo", json!(1)).await,
            Err(Error::NoHandler { .. })
        ));
    }

    #[tokio::test]
    async fn test_stop_replying() {
        let router = Router::new();
        router.reply("c", "one", echo()).await.unwrap();
        router.reply("c", "two", echo()).await.unwrap();
        router.reply("d", "one", echo()).await.unwrap();

        assert!(router.stop_replying("c", "one").await);
        assert!(!router.stop_replying("c", "one").await);
        assert!(!router.is_replying("c", "one").await);
        assert!(router.is_replying("c", "two").await);
        assert!(router.is_replying("d", "one").await);
    }

    #[tokio::test]
    async fn test_handler_error_is_wrapped() {
        let router = Router::new();
        router
            .reply(
                "collections/Tags",
                "addTags",
                handler_fn(|_| async { Err(Error::Storage("locked".to_string())) }),
            )
            .await
            .unwrap();

        let err = router
            .request("collections/Tags", "addTags", json!({}))
            .await
            .unwrap_err();
        match err {
            Error::Collaborator {
                channel, message, ..
            } => {
                assert_eq!(channel, "collections/Tags");
                assert!(message.contains("locked"));
            }
            other => panic!("Expected Collaborator error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_handler_may_issue_nested_requests() {
        let router = Arc::new(Router::new());
        router.reply("inner", "value", echo()).await.unwrap();

        let weak = Arc::downgrade(&router);
        router
            .reply(
                "outer",
                "value",
                handler_fn(move |payload| {
                    let weak = weak.clone();
                    async move {
                        let router = weak
                            .upgrade()
                            .ok_or_else(|| Error::Internal("router dropped".to_string()))?;
                        router.request("inner", "value", payload).await
                    }
                }),
            )
            .await
            .unwrap();

        let reply = router.request("outer", "value", json!(7)).await.unwrap();
        assert_eq!(reply, json!(7));
    }

    #[tokio::test]
    async fn test_request_as_typed() {
        let router = Router::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        router
            .reply(
                "collections/Configs",
                "findConfig",
                handler_fn(move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    async { Ok(json!("title")) }
                }),
            )
            .await
            .unwrap();

        let value: String = router
            .request_as("collections/Configs", "findConfig", &json!({"name": "sortnotes"}))
            .await
            .unwrap();
        assert_eq!(value, "title");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_request_as_rejects_unexpected_reply() {
        let router = Router::new();
        router.reply("c", "echo", echo()).await.unwrap();

        let err = router
            .request_as::<_, Vec<String>>("c", "echo", &json!({"not": "a list"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Collaborator { .. }));
    }
}
