//! The bus itself: per-type subscriber lists and snapshot dispatch.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use keel_telemetry::{log_error, log_info};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

use crate::handler::{erase, handler_id, Handler, HandlerEntry, HandlerError};
use crate::Event;

/// Errors from publishing an event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// A handler failed; handlers after `index` were not invoked.
    #[error("handler {index} failed during dispatch: {source}")]
    HandlerFailed {
        /// Position of the failing handler in the dispatch snapshot.
        index: usize,
        /// The handler's error.
        #[source]
        source: HandlerError,
    },
}

/// Type-keyed synchronous publish/subscribe channel.
///
/// One subscriber list per event type, in subscription order. All methods
/// take `&self`; the bus is safe to share behind an `Arc`.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<HashMap<TypeId, Vec<HandlerEntry>>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of type `E`.
    ///
    /// Handlers are invoked in subscription order. Subscribing the same
    /// `Arc` twice is a no-op; returns whether the handler was newly
    /// added. A subscription made while a dispatch of `E` is in flight
    /// joins future publishes only.
    pub fn subscribe<E: Event>(&self, handler: Handler<E>) -> bool {
        let id = handler_id(&handler);
        let mut table = self.handlers.write();
        let list = table.entry(TypeId::of::<E>()).or_default();

        if list.iter().any(|entry| entry.id == id) {
            debug!(
                event = std::any::type_name::<E>(),
                "handler already subscribed; ignoring"
            );
            return false;
        }

        list.push(erase(&handler));
        debug!(
            event = std::any::type_name::<E>(),
            subscribers = list.len(),
            "handler subscribed"
        );
        true
    }

    /// Remove `handler` from `E`'s subscriber list.
    ///
    /// Identity-based: pass the same `Arc` that was subscribed. Safe to
    /// call for a handler that was never subscribed. When the list
    /// empties, the type entry is pruned. A removal made while a dispatch
    /// of `E` is in flight does not affect that dispatch.
    pub fn unsubscribe<E: Event>(&self, handler: &Handler<E>) {
        let id = handler_id(handler);
        let key = TypeId::of::<E>();
        let mut table = self.handlers.write();

        if let Some(list) = table.get_mut(&key) {
            list.retain(|entry| entry.id != id);
            if list.is_empty() {
                table.remove(&key);
            }
            debug!(event = std::any::type_name::<E>(), "handler unsubscribed");
        }
    }

    /// Publish `event` to every current subscriber of `E`, in
    /// subscription order.
    ///
    /// Dispatch runs against a snapshot of the subscriber list taken
    /// before the first invocation, so handlers may freely subscribe and
    /// unsubscribe during the dispatch.
    ///
    /// # Errors
    ///
    /// Stops at the first failing handler and returns
    /// [`PublishError::HandlerFailed`]; handlers after it are not invoked
    /// for this event.
    pub fn publish<E: Event>(&self, event: &E) -> Result<usize, PublishError> {
        let snapshot: Vec<HandlerEntry> = self
            .handlers
            .read()
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();

        let mut delivered = 0;
        for entry in &snapshot {
            if let Err(source) = (entry.erased)(event) {
                log_error!(
                    "handler {} for {} failed: {}; aborting dispatch",
                    delivered,
                    std::any::type_name::<E>(),
                    source
                );
                return Err(PublishError::HandlerFailed {
                    index: delivered,
                    source,
                });
            }
            delivered += 1;
        }

        Ok(delivered)
    }

    /// Number of current subscribers for `E`.
    #[must_use]
    pub fn subscriber_count<E: Event>(&self) -> usize {
        self.handlers
            .read()
            .get(&TypeId::of::<E>())
            .map_or(0, Vec::len)
    }

    /// Drop every subscription. Used at full teardown only.
    pub fn clear(&self) {
        self.handlers.write().clear();
        log_info!("cleared all event subscriptions");
    }
}

impl shared_singleton::Singleton for EventBus {
    fn create() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
