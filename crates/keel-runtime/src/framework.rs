//! The lifecycle orchestrator.

use std::sync::Arc;

use data_manager::DataManager;
use event_bus::EventBus;
use keel_telemetry::{log_error, log_info, log_warn};
use parking_lot::RwLock;
use service_locator::ServiceLocator;
use shared_singleton::{instance_of, signal_termination, Singleton};
use thiserror::Error;
use tracing::debug;

use crate::config::FrameworkConfig;
use crate::module::Module;

/// Lifecycle state of the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameworkState {
    /// Not initialized; modules can be registered but are not running.
    Uninitialized,
    /// `initialize` is in progress.
    Initializing,
    /// Initialized; `on_tick` fans out to modules.
    Running,
    /// `shutdown` is in progress.
    ShuttingDown,
}

/// Errors from framework composition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameworkError {
    /// `initialize` was called before any configuration was supplied.
    #[error("framework configuration is missing; call configure() before initialize()")]
    ConfigurationMissing,

    /// The framework singleton was requested after the termination
    /// signal.
    #[error("framework requested after termination signal")]
    Terminating,
}

/// The lifecycle orchestrator.
///
/// Owns the module collection exclusively; the core systems are owned by
/// their own registries and only brought up and torn down from here. All
/// methods take `&self` and are meant to be driven sequentially by one
/// external loop.
pub struct Framework {
    config: RwLock<Option<FrameworkConfig>>,
    /// Registered modules, kept stably sorted by ascending priority.
    modules: RwLock<Vec<Arc<dyn Module>>>,
    /// Modules in the order they actually initialized; shutdown walks
    /// this in reverse rather than re-sorting.
    realized: RwLock<Vec<Arc<dyn Module>>>,
    state: RwLock<FrameworkState>,
}

impl Framework {
    /// Create an unconfigured framework.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RwLock::new(None),
            modules: RwLock::new(Vec::new()),
            realized: RwLock::new(Vec::new()),
            state: RwLock::new(FrameworkState::Uninitialized),
        }
    }

    /// Composition root: fetch the process-wide framework, apply
    /// `config`, and initialize it when `auto_initialize` is set.
    ///
    /// # Errors
    ///
    /// [`FrameworkError::Terminating`] after the termination signal, or
    /// any error from [`Framework::initialize`].
    pub fn bootstrap(config: FrameworkConfig) -> Result<Arc<Self>, FrameworkError> {
        let framework = instance_of::<Self>().ok_or(FrameworkError::Terminating)?;
        let auto_initialize = config.auto_initialize;
        framework.configure(config);
        if auto_initialize {
            framework.initialize()?;
        }
        Ok(framework)
    }

    /// Supply (or replace) the configuration. Takes effect on the next
    /// `initialize`.
    pub fn configure(&self, config: FrameworkConfig) {
        *self.config.write() = Some(config);
    }

    /// The active configuration, if one was supplied.
    #[must_use]
    pub fn config(&self) -> Option<FrameworkConfig> {
        self.config.read().clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> FrameworkState {
        *self.state.read()
    }

    /// Whether the framework is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state() == FrameworkState::Running
    }

    /// Initialize the framework: core systems first, then modules in
    /// ascending priority order.
    ///
    /// A warning no-op when already running. On success the state is
    /// `Running`.
    ///
    /// # Errors
    ///
    /// [`FrameworkError::ConfigurationMissing`] when no configuration was
    /// supplied; nothing is touched in that case.
    pub fn initialize(&self) -> Result<(), FrameworkError> {
        match self.state() {
            FrameworkState::Uninitialized => {}
            state => {
                log_warn!("framework already initialized ({state:?}); skipping");
                return Ok(());
            }
        }

        let Some(config) = self.config() else {
            log_error!("framework configuration is not assigned");
            return Err(FrameworkError::ConfigurationMissing);
        };

        *self.state.write() = FrameworkState::Initializing;
        keel_telemetry::set_enabled(config.enable_logging);
        log_info!("initializing keel...");

        self.bring_up_core_systems(&config);

        // Stable sort, then snapshot: modules may re-enter the framework
        // from their initialize hooks.
        let snapshot = {
            let mut modules = self.modules.write();
            modules.sort_by_key(|module| module.priority());
            modules.clone()
        };
        for module in snapshot {
            module.initialize();
            log_info!(
                "initialized module: {} (priority: {})",
                module.name(),
                module.priority()
            );
            self.realized.write().push(module);
        }

        *self.state.write() = FrameworkState::Running;
        log_info!("keel initialized successfully");
        Ok(())
    }

    /// Fan one external tick out to every module, in priority order.
    ///
    /// A no-op unless running. Runs at frame rate; does not suspend.
    pub fn on_tick(&self) {
        if !self.is_running() {
            return;
        }
        let snapshot = self.modules.read().clone();
        for module in &snapshot {
            module.on_update();
        }
    }

    /// Shut the framework down: modules in reverse realized order, then
    /// the core systems (dependents before dependencies).
    ///
    /// A no-op unless running. Afterwards the state is `Uninitialized`
    /// and the framework can be initialized again.
    pub fn shutdown(&self) {
        if !self.is_running() {
            return;
        }
        *self.state.write() = FrameworkState::ShuttingDown;
        log_info!("shutting down keel...");

        let realized = std::mem::take(&mut *self.realized.write());
        for module in realized.iter().rev() {
            module.shutdown();
            log_info!("shut down module: {}", module.name());
        }
        self.modules.write().clear();

        self.tear_down_core_systems();

        *self.state.write() = FrameworkState::Uninitialized;
        log_info!("keel shutdown complete");
    }

    /// Register a module.
    ///
    /// A warning no-op when a module with the same name is already
    /// present. When the framework is already running, the module's
    /// `initialize` runs immediately and it joins the end of the realized
    /// order.
    pub fn register_module(&self, module: Arc<dyn Module>) {
        {
            let mut modules = self.modules.write();
            if modules.iter().any(|m| m.name() == module.name()) {
                log_warn!("module {} is already registered", module.name());
                return;
            }
            modules.push(Arc::clone(&module));
            modules.sort_by_key(|m| m.priority());
        }
        log_info!(
            "registered module: {} (priority: {})",
            module.name(),
            module.priority()
        );

        if self.is_running() {
            module.initialize();
            log_info!("initialized module: {}", module.name());
            self.realized.write().push(module);
        }
    }

    /// Shut down and remove the module named `name`.
    ///
    /// A warning no-op when no such module is registered.
    pub fn unregister_module(&self, name: &str) {
        let found = {
            let mut modules = self.modules.write();
            match modules.iter().position(|m| m.name() == name) {
                Some(index) => Some(modules.remove(index)),
                None => None,
            }
        };
        let Some(module) = found else {
            log_warn!("module {name} is not registered");
            return;
        };

        module.shutdown();
        self.realized.write().retain(|m| m.name() != name);
        log_info!("unregistered module: {name}");
    }

    /// Number of registered modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.modules.read().len()
    }

    /// React to a scene/context transition.
    ///
    /// A no-op when `persist_across_scenes` is set (or nothing is
    /// configured); otherwise the framework shuts down with the unloaded
    /// context.
    pub fn handle_context_unload(&self) {
        let persist = self
            .config()
            .map_or(true, |config| config.persist_across_scenes);
        if persist {
            debug!("context unloaded; framework persists");
            return;
        }
        log_info!("context unloaded; shutting down framework");
        self.shutdown();
    }

    /// Shut down and raise the process-wide termination signal.
    ///
    /// For process exit: afterwards no singleton can be resurrected.
    pub fn terminate(&self) {
        self.shutdown();
        signal_termination();
        log_info!("keel terminated");
    }

    fn bring_up_core_systems(&self, config: &FrameworkConfig) {
        if !config.any_core_system_enabled() {
            log_warn!("all core systems are disabled; modules will run without them");
        }

        if config.enable_event_bus && instance_of::<EventBus>().is_some() {
            log_info!("event bus initialized");
        }
        if config.enable_service_locator && instance_of::<ServiceLocator>().is_some() {
            log_info!("service locator initialized");
        }
        if config.enable_data_manager && instance_of::<DataManager>().is_some() {
            log_info!("data manager initialized");
        }
    }

    /// Clear order matters: domains and services may still hold event
    /// subscriptions, so the bus goes last.
    fn tear_down_core_systems(&self) {
        let Some(config) = self.config() else {
            return;
        };

        if config.enable_data_manager {
            if let Some(manager) = instance_of::<DataManager>() {
                manager.clear();
            }
        }
        if config.enable_service_locator {
            if let Some(locator) = instance_of::<ServiceLocator>() {
                locator.clear();
            }
        }
        if config.enable_event_bus {
            if let Some(bus) = instance_of::<EventBus>() {
                bus.clear();
            }
        }
    }
}

impl Default for Framework {
    fn default() -> Self {
        Self::new()
    }
}

impl Singleton for Framework {
    fn create() -> Arc<Self> {
        Arc::new(Self::new())
    }
}
