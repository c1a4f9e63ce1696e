//! # Event Bus
//!
//! Type-keyed synchronous publish/subscribe channel for cross-module
//! communication.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │   Module A   │                    │   Module B   │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! ## Dispatch Semantics
//!
//! - Handlers run synchronously, in subscription order, on the publishing
//!   thread.
//! - `publish` iterates a snapshot of the subscriber list: handlers that
//!   subscribe or unsubscribe during a dispatch affect only future
//!   publishes, never the in-flight one.
//! - A handler error stops the remaining handlers of that dispatch and is
//!   returned to the publisher as [`PublishError::HandlerFailed`].
//!
//! ## Ownership
//!
//! The bus holds non-owning handler callbacks only; it never retains an
//! event past a single dispatch. Subscribers must unsubscribe before their
//! own teardown.

pub mod bus;
pub mod handler;

pub use bus::{EventBus, PublishError};
pub use handler::{handler, Handler, HandlerError, HandlerResult};

use std::any::Any;

/// Marker trait for event payloads.
///
/// Events are immutable, tag-typed values: the concrete type is the
/// subscription key. They carry no identity of their own.
pub trait Event: Any + Send + Sync {}
