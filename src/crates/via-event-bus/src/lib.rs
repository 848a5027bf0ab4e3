//! In-process publish/subscribe event bus (spec.md §4.1), grounded on
//! `langgraph_core::runtime::StreamWriter`'s fire-and-forget write semantics
//! and the Pregel executor's pattern of isolating per-node failures.
//!
//! `emit` never blocks the caller beyond queueing: each handler invocation
//! runs in its own `tokio::task`, and a handler that errors or panics is
//! logged and swallowed — it never propagates back to the emitter. Delivery
//! to a single subscriber preserves emission order (each subscriber's
//! handlers are invoked from a private per-subscriber task queue); no
//! ordering is guaranteed across subscribers.

pub mod events;

use async_trait::async_trait;
use events::{Event, Topic};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

/// A subscriber to one or more topics. Implementations may be synchronous
/// (return immediately) or perform their own `.await`s; both are scheduled
/// identically by the bus.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Event) -> Result<(), String>;
}

struct Subscription {
    tx: mpsc::UnboundedSender<Event>,
}

/// Process-wide broker keyed by a fixed enum of topics (§9 "global singletons":
/// model provider, event bus, and the extraction cache/rate limiter are the
/// workspace's process-wide services).
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Arc<RwLock<HashMap<Topic, Vec<Subscription>>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `topic`. Each subscriber gets its own ordered
    /// delivery queue, drained by a background task, so a slow handler on
    /// one subscriber never delays another subscriber's handler.
    pub async fn subscribe(&self, topic: Topic, handler: Arc<dyn EventHandler>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
        {
            let mut subs = self.subscriptions.write().await;
            subs.entry(topic).or_default().push(Subscription { tx });
        }
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if let Err(err) = handler.handle(event.clone()).await {
                    tracing::error!(topic = ?event.topic(), error = %err, "event handler failed");
                }
            }
        });
    }

    /// Fire-and-forget: queues `event` on every subscriber of its topic and
    /// returns immediately.
    pub async fn emit(&self, event: Event) {
        let topic = event.topic();
        let subs = self.subscriptions.read().await;
        if let Some(subscribers) = subs.get(&topic) {
            for sub in subscribers {
                // An unbounded channel never blocks; a closed receiver (the
                // subscriber task panicked) is logged and ignored, matching
                // "failures inside a handler are logged and swallowed".
                if sub.tx.send(event.clone()).is_err() {
                    tracing::warn!(?topic, "event subscriber channel closed, dropping event");
                }
            }
        }
    }

    pub async fn subscriber_count(&self, topic: Topic) -> usize {
        self.subscriptions
            .read()
            .await
            .get(&topic)
            .map(|v| v.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::CardEventPayload;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        count: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: Event) -> Result<(), String> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingHandler;

    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _event: Event) -> Result<(), String> {
            Err("boom".to_string())
        }
    }

    fn sample_event() -> Event {
        Event::CardCreated(CardEventPayload {
            card_id: "c1".into(),
            canvas_id: "canvas-1".into(),
            content: Some("hello".into()),
            title: Some("Title".into()),
            metadata: None,
        })
    }

    #[tokio::test]
    async fn emit_delivers_to_all_subscribers_of_the_topic() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        bus.subscribe(
            Topic::CardCreated,
            Arc::new(CountingHandler { count: count.clone() }),
        )
        .await;
        bus.emit(sample_event()).await;
        // give the background task a turn
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_failing_handler_does_not_prevent_future_deliveries() {
        let bus = EventBus::new();
        bus.subscribe(Topic::CardCreated, Arc::new(FailingHandler)).await;
        let count = Arc::new(AtomicUsize::new(0));
        bus.subscribe(
            Topic::CardCreated,
            Arc::new(CountingHandler { count: count.clone() }),
        )
        .await;
        bus.emit(sample_event()).await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn emit_with_no_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.emit(sample_event()).await;
        assert_eq!(bus.subscriber_count(Topic::CardCreated).await, 0);
    }
}
