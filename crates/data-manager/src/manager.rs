//! The domain registry and its one-shot bulk loader.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use keel_telemetry::{log_error, log_info, log_warn};
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{DataError, Domain};

/// Outcome of a [`DataManager::load_all`] call.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// The registry was already marked loaded; nothing was invoked.
    pub skipped: bool,
    /// Names of domains that loaded successfully, in load order.
    pub loaded: Vec<String>,
    /// Domains whose load routine failed, with the contained error.
    pub failed: Vec<(String, DataError)>,
}

impl LoadReport {
    /// Whether every domain in the batch loaded successfully.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.skipped && self.failed.is_empty()
    }
}

/// A stored domain: the registry view plus a type-erased view of the same
/// instance for downcasting in `get_domain`.
struct DomainEntry {
    domain: Arc<dyn Domain>,
    instance: Arc<dyn Any + Send + Sync>,
}

/// Map plus explicit insertion order.
///
/// Load order is observable through partially failed batches, so it is
/// pinned to registration order rather than map iteration order.
#[derive(Default)]
struct DomainTable {
    entries: HashMap<TypeId, DomainEntry>,
    order: Vec<TypeId>,
}

/// Type-keyed registry of data domains.
#[derive(Default)]
pub struct DataManager {
    table: RwLock<DomainTable>,
    loaded: AtomicBool,
}

impl DataManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `domain` under its concrete type.
    ///
    /// Registration never triggers loading. Re-registering a type
    /// overwrites the previous instance with a warning and keeps its
    /// original position in the load order.
    pub fn register_domain<D: Domain>(&self, domain: Arc<D>) {
        let key = TypeId::of::<D>();
        let name = domain.name().to_owned();

        // Two views of one instance, like the service locator.
        let entry = DomainEntry {
            domain: Arc::clone(&domain) as Arc<dyn Domain>,
            instance: Arc::clone(&domain) as Arc<dyn Any + Send + Sync>,
        };

        let mut table = self.table.write();
        if table.entries.insert(key, entry).is_some() {
            log_warn!("domain {name} already registered; overwriting");
        } else {
            table.order.push(key);
        }
        drop(table);

        log_info!("registered domain: {name}");
    }

    /// Get the registered instance of `D`.
    ///
    /// # Errors
    ///
    /// [`DataError::DomainNotFound`] if no instance is registered under
    /// `D`. Never returns a default-constructed instance.
    pub fn get_domain<D: Domain>(&self) -> Result<Arc<D>, DataError> {
        let not_found = || DataError::DomainNotFound {
            type_name: std::any::type_name::<D>(),
        };

        let table = self.table.read();
        let entry = table.entries.get(&TypeId::of::<D>()).ok_or_else(|| {
            debug!(domain = std::any::type_name::<D>(), "domain lookup missed");
            not_found()
        })?;
        Arc::clone(&entry.instance)
            .downcast::<D>()
            .map_err(|_| not_found())
    }

    /// Whether a domain of type `D` is registered. No side effects.
    #[must_use]
    pub fn has_domain<D: Domain>(&self) -> bool {
        self.table.read().entries.contains_key(&TypeId::of::<D>())
    }

    /// Whether a `load_all` cycle has completed since the last `clear`.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// Invoke every registered domain's load routine, once.
    ///
    /// Domains load in registration order. A failing domain is logged and
    /// recorded in the report, and the remaining domains still load. After
    /// the first call the registry is marked loaded and further calls are
    /// skipped until [`DataManager::clear`].
    pub fn load_all(&self) -> LoadReport {
        if self.loaded.load(Ordering::SeqCst) {
            log_warn!("domains already loaded; skipping");
            return LoadReport {
                skipped: true,
                ..LoadReport::default()
            };
        }

        log_info!("loading all domains...");

        // Snapshot in registration order; no lock held while domains run.
        let snapshot: Vec<Arc<dyn Domain>> = {
            let table = self.table.read();
            table
                .order
                .iter()
                .filter_map(|key| table.entries.get(key))
                .map(|entry| Arc::clone(&entry.domain))
                .collect()
        };

        let mut report = LoadReport::default();
        for domain in &snapshot {
            let name = domain.name().to_owned();
            match domain.load_data() {
                Ok(()) => {
                    log_info!("loaded domain: {name}");
                    report.loaded.push(name);
                }
                Err(error) => {
                    log_error!("failed to load domain {name}: {error}");
                    report.failed.push((name, error));
                }
            }
        }

        // Marked loaded even with failures; a retry requires clear().
        self.loaded.store(true, Ordering::SeqCst);
        log_info!(
            "domain load finished: {} loaded, {} failed",
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    /// Remove all domains and reset the loaded flag.
    ///
    /// After clearing, fresh registrations can be loaded by a new
    /// `load_all` cycle.
    pub fn clear(&self) {
        let mut table = self.table.write();
        table.entries.clear();
        table.order.clear();
        drop(table);
        self.loaded.store(false, Ordering::SeqCst);
        log_info!("cleared all domains");
    }
}

impl shared_singleton::Singleton for DataManager {
    fn create() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
