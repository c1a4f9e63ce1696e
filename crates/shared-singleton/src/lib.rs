//! # Shared Singleton
//!
//! Process-wide, lazily constructed one-instance-per-type storage.
//!
//! Every core Keel system (event bus, service locator, data manager, the
//! framework itself) is reached through [`instance_of`], which constructs
//! the instance on first access and hands out the same `Arc` afterwards.
//! Construction is double-checked so racing first-accesses from multiple
//! threads still produce exactly one instance.
//!
//! Once [`signal_termination`] has been raised (process shutdown),
//! [`instance_of`] stops constructing and returns `None`. This prevents a
//! late caller from resurrecting a system that was already torn down.
//!
//! ```rust
//! use std::sync::Arc;
//! use shared_singleton::{instance_of, Singleton};
//!
//! struct Clock;
//!
//! impl Singleton for Clock {
//!     fn create() -> Arc<Self> {
//!         Arc::new(Clock)
//!     }
//! }
//!
//! let a = instance_of::<Clock>().unwrap();
//! let b = instance_of::<Clock>().unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//! ```

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use keel_telemetry::log_warn;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::debug;

/// A type that has exactly one process-wide instance.
///
/// Implementors are constructed at most once per process, the first time
/// [`instance_of`] is called for the type.
pub trait Singleton: Any + Send + Sync {
    /// Construct the process-wide instance.
    ///
    /// Called under the instance-table lock, which is not reentrant:
    /// implementations must not call [`instance_of`].
    fn create() -> Arc<Self>
    where
        Self: Sized;
}

lazy_static! {
    /// Type-erased instance table, keyed by `TypeId`.
    static ref INSTANCES: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>> =
        RwLock::new(HashMap::new());
}

/// Raised once at process shutdown; never cleared.
static TERMINATING: AtomicBool = AtomicBool::new(false);

/// Get the process-wide instance of `T`, constructing it on first access.
///
/// Returns `None` once [`signal_termination`] has been raised, so callers
/// racing with shutdown cannot resurrect a torn-down instance.
#[must_use]
pub fn instance_of<T: Singleton>() -> Option<Arc<T>> {
    if TERMINATING.load(Ordering::SeqCst) {
        log_warn!(
            "instance of {} requested after termination; returning None",
            std::any::type_name::<T>()
        );
        return None;
    }

    let key = TypeId::of::<T>();

    // Fast path: already constructed.
    if let Some(existing) = INSTANCES.read().get(&key) {
        return Arc::clone(existing).downcast::<T>().ok();
    }

    // Slow path: re-check under the write lock, another thread may have
    // won the construction race in between.
    let mut table = INSTANCES.write();
    let entry = table.entry(key).or_insert_with(|| {
        debug!(instance = std::any::type_name::<T>(), "constructing singleton");
        let created: Arc<dyn Any + Send + Sync> = T::create();
        created
    });
    Arc::clone(entry).downcast::<T>().ok()
}

/// Whether an instance of `T` has already been constructed.
#[must_use]
pub fn has_instance<T: Singleton>() -> bool {
    INSTANCES.read().contains_key(&TypeId::of::<T>())
}

/// Raise the process-wide termination signal.
///
/// After this call, [`instance_of`] returns `None` for every type. The
/// signal is one-way; instances already handed out stay valid for as long
/// as their `Arc`s live.
pub fn signal_termination() {
    TERMINATING.store(true, Ordering::SeqCst);
}

/// Whether the termination signal has been raised.
#[must_use]
pub fn is_terminating() -> bool {
    TERMINATING.load(Ordering::SeqCst)
}
