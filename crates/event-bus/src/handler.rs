//! Subscriber callbacks and their type-erased storage form.

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

use crate::Event;

/// Error signalled by a failing handler.
///
/// Carries a message only; the bus does not interpret it beyond aborting
/// the in-flight dispatch.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create a handler error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// A subscriber callback for events of type `E`.
///
/// The `Arc` allocation is the handler's identity: subscribing the same
/// `Arc` twice is a no-op, and [`crate::EventBus::unsubscribe`] must be
/// given the same `Arc` that was subscribed.
pub type Handler<E> = Arc<dyn Fn(&E) -> HandlerResult + Send + Sync>;

/// Wrap a closure into a [`Handler`].
pub fn handler<E, F>(f: F) -> Handler<E>
where
    E: Event,
    F: Fn(&E) -> HandlerResult + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Type-erased callback invoked with the event as `&dyn Any`.
type ErasedFn = dyn Fn(&(dyn Any + Send + Sync)) -> HandlerResult + Send + Sync;

/// A stored subscriber: erased callback plus the identity of the original
/// `Arc` for dedup and removal.
#[derive(Clone)]
pub(crate) struct HandlerEntry {
    pub(crate) id: usize,
    pub(crate) erased: Arc<ErasedFn>,
}

/// Pointer identity of a handler `Arc`.
pub(crate) fn handler_id<E: Event>(h: &Handler<E>) -> usize {
    Arc::as_ptr(h) as *const () as usize
}

/// Erase a typed handler for storage in the per-type subscriber list.
pub(crate) fn erase<E: Event>(h: &Handler<E>) -> HandlerEntry {
    let id = handler_id(h);
    let typed = Arc::clone(h);
    HandlerEntry {
        id,
        erased: Arc::new(move |any| match any.downcast_ref::<E>() {
            Some(event) => typed(event),
            // Unreachable through the bus: entries are keyed by TypeId.
            None => Ok(()),
        }),
    }
}
