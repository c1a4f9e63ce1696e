//! # Service Locator
//!
//! Type-keyed store of long-lived service instances.
//!
//! Services are registered under their concrete type and retrieved by the
//! same type. The locator owns the instances it stores: registering calls
//! the service's `initialize`, and removal (overwrite, unregister, clear)
//! calls `dispose`. At most one instance exists per type key at any time.
//!
//! Lookups fail fast: [`ServiceLocator::get`] returns
//! [`LocatorError::ServiceNotFound`] rather than a silent default.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use keel_telemetry::{log_info, log_warn};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

/// A long-lived capability object managed by the [`ServiceLocator`].
///
/// `initialize` runs when the service is registered, `dispose` when it is
/// removed. Both default to no-ops; implementations use interior
/// mutability for their own state.
pub trait Service: Any + Send + Sync {
    /// Unique human-readable name, used in diagnostics.
    fn name(&self) -> &str;

    /// Called after the service is stored in the locator.
    fn initialize(&self) {}

    /// Called before the service is removed from the locator.
    fn dispose(&self) {}
}

/// Errors from service lookups.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    /// No service is registered under the requested type key.
    #[error("service {type_name} is not registered")]
    ServiceNotFound {
        /// The requested service type.
        type_name: &'static str,
    },
}

/// A stored service: the lifecycle view plus a type-erased view of the
/// same instance for downcasting in `get`.
struct ServiceEntry {
    service: Arc<dyn Service>,
    instance: Arc<dyn Any + Send + Sync>,
}

/// Type-keyed registry of service instances.
#[derive(Default)]
pub struct ServiceLocator {
    services: RwLock<HashMap<TypeId, ServiceEntry>>,
}

impl ServiceLocator {
    /// Create an empty locator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `service` under its concrete type.
    ///
    /// If the key is already taken, the previous instance is disposed
    /// first (logged as a duplicate-registration warning) and then
    /// overwritten. The new service's `initialize` runs after it is
    /// stored. Lifecycle callbacks run with no registry lock held, so a
    /// service may call back into the locator.
    pub fn register<T: Service>(&self, service: Arc<T>) {
        let key = TypeId::of::<T>();

        let previous = self.services.write().remove(&key);
        if let Some(old) = previous {
            log_warn!(
                "service {} already registered; overwriting",
                old.service.name()
            );
            old.service.dispose();
        }

        // Two views of one instance: lifecycle dispatch and `get` downcast.
        let entry = ServiceEntry {
            service: Arc::clone(&service) as Arc<dyn Service>,
            instance: Arc::clone(&service) as Arc<dyn Any + Send + Sync>,
        };
        self.services.write().insert(key, entry);
        service.initialize();

        log_info!("registered service: {}", service.name());
    }

    /// Get the registered instance of `T`.
    ///
    /// # Errors
    ///
    /// [`LocatorError::ServiceNotFound`] if no instance is registered
    /// under `T`. Never returns a default-constructed instance.
    pub fn get<T: Service>(&self) -> Result<Arc<T>, LocatorError> {
        let not_found = || LocatorError::ServiceNotFound {
            type_name: std::any::type_name::<T>(),
        };

        let table = self.services.read();
        let entry = table.get(&TypeId::of::<T>()).ok_or_else(not_found)?;
        Arc::clone(&entry.instance)
            .downcast::<T>()
            .map_err(|_| not_found())
    }

    /// Whether an instance of `T` is registered. No side effects.
    #[must_use]
    pub fn has<T: Service>(&self) -> bool {
        self.services.read().contains_key(&TypeId::of::<T>())
    }

    /// Dispose and remove the instance of `T`, if any.
    ///
    /// A no-op (not an error) when `T` is absent.
    pub fn unregister<T: Service>(&self) {
        let removed = self.services.write().remove(&TypeId::of::<T>());
        match removed {
            Some(entry) => {
                entry.service.dispose();
                log_info!("unregistered service: {}", entry.service.name());
            }
            None => debug!(
                service = std::any::type_name::<T>(),
                "unregister for unknown service; ignoring"
            ),
        }
    }

    /// Number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.read().len()
    }

    /// Whether the locator is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.read().is_empty()
    }

    /// Dispose every stored instance, then empty the registry.
    ///
    /// Used at full teardown. Disposal order is unspecified but
    /// exhaustive.
    pub fn clear(&self) {
        let drained: Vec<ServiceEntry> = {
            let mut table = self.services.write();
            table.drain().map(|(_, entry)| entry).collect()
        };
        for entry in &drained {
            entry.service.dispose();
        }
        log_info!("cleared {} services", drained.len());
    }
}

impl shared_singleton::Singleton for ServiceLocator {
    fn create() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
