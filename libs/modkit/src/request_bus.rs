//! Topic-keyed request/response bus.
//!
//! Providers answer a named topic, consumers ask it without knowing who answers:
//! - During module initialization, a provider registers one handler per topic.
//! - Consumers ask by topic string with a typed request and get a typed response.
//! - The bus is an explicit object shared through `Arc`; there is no global instance.
//!
//! Implementation details:
//! - Key = topic string. Value = `Arc<dyn Fn(Req) -> BoxFuture<Result<Resp>>>` stored as
//!   `Box<dyn Any + Send + Sync>` together with the request/response type names.
//! - The lock is released before the handler future is awaited, so handlers may
//!   themselves ask the bus.
//!
//! Notes:
//! - Registering a topic twice is a wiring bug and fails with `AlreadyRegistered`;
//!   unlike client registration, answers must never silently change owner.

use futures::future::BoxFuture;
use parking_lot::RwLock;
use std::{
    any::Any,
    collections::{HashMap, HashSet},
    future::Future,
    sync::Arc,
};

/// Error type handlers return; anything convertible into it can be propagated with `?`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

type Handler<Req, Resp> = Arc<dyn Fn(Req) -> BoxFuture<'static, Result<Resp, BoxError>> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RequestBusError {
    #[error("no handler registered for topic '{topic}'")]
    NoHandler { topic: String },

    #[error("a handler is already registered for topic '{topic}'")]
    AlreadyRegistered { topic: String },

    #[error(
        "type mismatch on topic '{topic}': asked with {asked}, handler expects {registered}"
    )]
    TypeMismatch {
        topic: String,
        asked: &'static str,
        registered: &'static str,
    },

    #[error("handler for topic '{topic}' failed: {source}")]
    Handler {
        topic: String,
        #[source]
        source: BoxError,
    },
}

impl RequestBusError {
    /// Returns the handler failure, if this error wraps one.
    #[must_use]
    pub fn handler_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Handler { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

struct Entry {
    signature: &'static str,
    handler: Box<dyn Any + Send + Sync>,
}

impl Entry {
    fn new<Req, Resp, F, Fut>(handler: F) -> Self
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, BoxError>> + Send + 'static,
    {
        let boxed: Handler<Req, Resp> =
            Arc::new(move |req: Req| -> BoxFuture<'static, Result<Resp, BoxError>> {
                Box::pin(handler(req))
            });
        Self {
            signature: signature_of::<Req, Resp>(),
            handler: Box::new(boxed),
        }
    }
}

/// Handlers that must appear on the bus together or not at all.
///
/// ```ignore
/// bus.register_all(
///     Registrations::new()
///         .with("a:topic", |n: u32| async move { Ok::<_, BoxError>(n) })
///         .with("b:topic", |s: String| async move { Ok::<_, BoxError>(s.len()) }),
/// )?;
/// ```
#[derive(Default)]
pub struct Registrations {
    entries: Vec<(String, Entry)>,
}

impl Registrations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the handler answering `topic` to the batch.
    #[must_use]
    pub fn with<Req, Resp, F, Fut>(mut self, topic: impl Into<String>, handler: F) -> Self
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, BoxError>> + Send + 'static,
    {
        self.entries.push((topic.into(), Entry::new(handler)));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn signature_of<Req: 'static, Resp: 'static>() -> &'static str {
    // type_name is not guaranteed unique across compilations, but is stable within one.
    std::any::type_name::<fn(Req) -> Resp>()
}

/// Process-wide registry of request handlers keyed by topic.
pub struct RequestBus {
    handlers: RwLock<HashMap<String, Entry>>,
}

impl RequestBus {
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register the single handler answering `topic`.
    ///
    /// # Errors
    /// Returns `RequestBusError::AlreadyRegistered` if the topic already has a handler.
    pub fn register<Req, Resp, F, Fut>(
        &self,
        topic: impl Into<String>,
        handler: F,
    ) -> Result<(), RequestBusError>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
        F: Fn(Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, BoxError>> + Send + 'static,
    {
        let topic = topic.into();
        let entry = Entry::new(handler);

        let mut w = self.handlers.write();
        if w.contains_key(&topic) {
            return Err(RequestBusError::AlreadyRegistered { topic });
        }
        tracing::debug!(topic = %topic, "request bus: handler registered");
        w.insert(topic, entry);
        Ok(())
    }

    /// Register every handler of `batch` under one write lock.
    ///
    /// Either all topics become answerable or none does.
    ///
    /// # Errors
    /// Returns `RequestBusError::AlreadyRegistered` naming the first topic that already has a
    /// handler or appears twice in the batch; the bus is left unchanged.
    pub fn register_all(&self, batch: Registrations) -> Result<(), RequestBusError> {
        let mut w = self.handlers.write();
        let mut seen = HashSet::with_capacity(batch.entries.len());
        for (topic, _) in &batch.entries {
            if w.contains_key(topic) || !seen.insert(topic.as_str()) {
                return Err(RequestBusError::AlreadyRegistered {
                    topic: topic.clone(),
                });
            }
        }
        for (topic, entry) in batch.entries {
            tracing::debug!(topic = %topic, "request bus: handler registered");
            w.insert(topic, entry);
        }
        Ok(())
    }

    /// Ask `topic` with `req` and await the handler's answer.
    ///
    /// # Errors
    /// - `NoHandler` if nothing answers the topic
    /// - `TypeMismatch` if the handler was registered with other request/response types
    /// - `Handler` if the handler itself failed
    pub async fn ask<Req, Resp>(&self, topic: &str, req: Req) -> Result<Resp, RequestBusError>
    where
        Req: Send + 'static,
        Resp: Send + 'static,
    {
        let handler = {
            let r = self.handlers.read();
            let entry = r.get(topic).ok_or_else(|| RequestBusError::NoHandler {
                topic: topic.to_owned(),
            })?;
            entry
                .handler
                .downcast_ref::<Handler<Req, Resp>>()
                .cloned()
                .ok_or_else(|| RequestBusError::TypeMismatch {
                    topic: topic.to_owned(),
                    asked: signature_of::<Req, Resp>(),
                    registered: entry.signature,
                })?
        };

        handler(req)
            .await
            .map_err(|source| RequestBusError::Handler {
                topic: topic.to_owned(),
                source,
            })
    }

    /// Whether a handler answers `topic`.
    #[must_use]
    pub fn has_handler(&self, topic: &str) -> bool {
        self.handlers.read().contains_key(topic)
    }

    /// Registered topics, sorted.
    #[must_use]
    pub fn topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = self.handlers.read().keys().cloned().collect();
        topics.sort();
        topics
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl Default for RequestBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn register_and_ask_round_trip() {
        let bus = RequestBus::new();
        bus.register("math:double", |n: u32| async move { Ok::<_, BoxError>(n * 2) })
            .unwrap();

        let got: u32 = bus.ask("math:double", 21_u32).await.unwrap();
        assert_eq!(got, 42);
        assert!(bus.has_handler("math:double"));
        assert_eq!(bus.len(), 1);
    }

    #[tokio::test]
    async fn ask_unknown_topic_fails_with_no_handler() {
        let bus = RequestBus::new();

        let result = bus.ask::<String, bool>("store:index:isValid", "foo".to_owned()).await;

        match result {
            Err(RequestBusError::NoHandler { topic }) => assert_eq!(topic, "store:index:isValid"),
            other => panic!("expected NoHandler, got {other:?}"),
        }
    }

    #[test]
    fn registering_same_topic_twice_is_rejected() {
        let bus = RequestBus::new();
        bus.register("t", |()| async { Ok::<_, BoxError>(1_u8) }).unwrap();

        let second = bus.register("t", |()| async { Ok::<_, BoxError>(2_u8) });

        assert!(matches!(
            second,
            Err(RequestBusError::AlreadyRegistered { ref topic }) if topic == "t"
        ));
        assert_eq!(bus.len(), 1, "first registration must survive");
    }

    #[tokio::test]
    async fn register_all_makes_every_topic_answerable() {
        let bus = RequestBus::new();

        bus.register_all(
            Registrations::new()
                .with("len", |s: String| async move { Ok::<_, BoxError>(s.len()) })
                .with("double", |n: u32| async move { Ok::<_, BoxError>(n * 2) }),
        )
        .unwrap();

        let len: usize = bus.ask("len", "abc".to_owned()).await.unwrap();
        let double: u32 = bus.ask("double", 4_u32).await.unwrap();
        assert_eq!((len, double), (3, 8));
        assert_eq!(bus.topics(), vec!["double", "len"]);
    }

    #[test]
    fn register_all_leaves_bus_untouched_when_one_topic_is_taken() {
        let bus = RequestBus::new();
        bus.register("b", |()| async { Ok::<_, BoxError>(1_u8) }).unwrap();

        let batch = Registrations::new()
            .with("a", |()| async { Ok::<_, BoxError>(2_u8) })
            .with("b", |()| async { Ok::<_, BoxError>(3_u8) });
        assert_eq!(batch.len(), 2);
        let err = bus.register_all(batch).unwrap_err();

        assert!(matches!(err, RequestBusError::AlreadyRegistered { ref topic } if topic == "b"));
        assert!(!bus.has_handler("a"), "no topic of a rejected batch may be registered");
        assert_eq!(bus.len(), 1);
    }

    #[test]
    fn register_all_rejects_topic_repeated_in_batch() {
        let bus = RequestBus::new();

        let err = bus
            .register_all(
                Registrations::new()
                    .with("x", |()| async { Ok::<_, BoxError>(()) })
                    .with("x", |()| async { Ok::<_, BoxError>(()) }),
            )
            .unwrap_err();

        assert!(matches!(err, RequestBusError::AlreadyRegistered { ref topic } if topic == "x"));
        assert!(bus.is_empty());
    }

    #[tokio::test]
    async fn first_handler_keeps_answering_after_rejected_registration() {
        let bus = RequestBus::new();
        bus.register("t", |()| async { Ok::<_, BoxError>(1_u8) }).unwrap();
        let _ = bus.register("t", |()| async { Ok::<_, BoxError>(2_u8) });

        let got: u8 = bus.ask("t", ()).await.unwrap();
        assert_eq!(got, 1);
    }

    #[tokio::test]
    async fn ask_with_wrong_types_fails_with_type_mismatch() {
        let bus = RequestBus::new();
        bus.register("store:index:isValid", |name: String| async move {
            Ok::<_, BoxError>(!name.is_empty())
        })
        .unwrap();

        let result = bus.ask::<u32, bool>("store:index:isValid", 7).await;

        match result {
            Err(RequestBusError::TypeMismatch {
                asked, registered, ..
            }) => {
                assert!(asked.contains("u32"));
                assert!(registered.contains("String"));
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn handler_failure_is_wrapped_with_topic() {
        let bus = RequestBus::new();
        bus.register("fails", |()| async {
            Err::<(), BoxError>("backend down".into())
        })
        .unwrap();

        let err = bus.ask::<(), ()>("fails", ()).await.unwrap_err();

        assert!(matches!(err, RequestBusError::Handler { ref topic, .. } if topic == "fails"));
        assert_eq!(err.handler_source().unwrap().to_string(), "backend down");
    }

    #[tokio::test]
    async fn handler_may_ask_the_bus_reentrantly() {
        let bus = Arc::new(RequestBus::new());
        bus.register("inner", |n: u32| async move { Ok::<_, BoxError>(n + 1) })
            .unwrap();

        let bus_for_outer = Arc::clone(&bus);
        bus.register("outer", move |n: u32| {
            let bus = Arc::clone(&bus_for_outer);
            async move {
                let inner: u32 = bus.ask("inner", n).await?;
                Ok::<_, BoxError>(inner * 10)
            }
        })
        .unwrap();

        let got: u32 = bus.ask("outer", 1_u32).await.unwrap();
        assert_eq!(got, 20);
    }

    #[test]
    fn topics_are_sorted_and_len_tracks_registrations() {
        let bus = RequestBus::new();
        assert!(bus.is_empty());

        bus.register("b", |()| async { Ok::<_, BoxError>(()) }).unwrap();
        bus.register("a", |()| async { Ok::<_, BoxError>(()) }).unwrap();

        assert_eq!(bus.topics(), vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(bus.len(), 2);
        assert!(!bus.is_empty());
    }

    #[tokio::test]
    async fn concurrent_asks_all_reach_the_handler() {
        let bus = Arc::new(RequestBus::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        bus.register("count", move |()| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(())
            }
        })
        .unwrap();

        let mut handles = vec![];
        for _ in 0..10 {
            let bus = Arc::clone(&bus);
            handles.push(tokio::spawn(async move {
                bus.ask::<(), ()>("count", ()).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 10);
    }
}
