//! Whole-framework flow through the process-wide singletons.
//!
//! Touches global state (singleton table, termination flag), so the whole
//! flow lives in one test in its own binary/process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use data_manager::{DataEntity, DataError, DataManager, Domain, EntityStore};
use event_bus::{handler, Event, EventBus};
use keel_runtime::{Framework, FrameworkConfig, Module};
use parking_lot::RwLock;
use service_locator::{Service, ServiceLocator};
use shared_singleton::instance_of;

#[derive(Debug)]
struct GameStarted;
impl Event for GameStarted {}

#[derive(Debug, Clone)]
struct LevelRecord {
    id: u32,
}

impl DataEntity for LevelRecord {
    fn id(&self) -> u32 {
        self.id
    }

    fn validate(&self) -> bool {
        true
    }
}

struct LevelDomain {
    store: EntityStore<LevelRecord>,
}

impl Domain for LevelDomain {
    fn name(&self) -> &str {
        "levels"
    }

    fn load_data(&self) -> Result<(), DataError> {
        for id in 1..=3 {
            self.store.insert(LevelRecord { id })?;
        }
        Ok(())
    }
}

struct SceneService {
    dispose_calls: AtomicUsize,
}

impl Service for SceneService {
    fn name(&self) -> &str {
        "scene"
    }

    fn dispose(&self) {
        self.dispose_calls.fetch_add(1, Ordering::SeqCst);
    }
}

struct BootModule {
    trace: Arc<RwLock<Vec<String>>>,
}

impl Module for BootModule {
    fn name(&self) -> &str {
        "boot"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn initialize(&self) {
        self.trace.write().push("boot:init".to_owned());

        // Populate the global registries the way a real boot module
        // would: domains first, then services, then a bulk load.
        let manager = instance_of::<DataManager>().expect("data manager up");
        manager.register_domain(Arc::new(LevelDomain {
            store: EntityStore::new(),
        }));
        let report = manager.load_all();
        assert!(report.is_complete());

        let locator = instance_of::<ServiceLocator>().expect("locator up");
        locator.register(Arc::new(SceneService {
            dispose_calls: AtomicUsize::new(0),
        }));
    }

    fn shutdown(&self) {
        self.trace.write().push("boot:down".to_owned());
    }
}

#[test]
fn test_end_to_end_lifecycle_through_singletons() {
    let _ = keel_telemetry::init("warn");

    // Compose explicitly; all core systems enabled.
    let framework = Framework::bootstrap(FrameworkConfig {
        auto_initialize: false,
        ..FrameworkConfig::default()
    })
    .expect("bootstrap");

    let trace: Arc<RwLock<Vec<String>>> = Arc::default();
    framework.register_module(Arc::new(BootModule {
        trace: Arc::clone(&trace),
    }));

    framework.initialize().expect("initialize");
    assert!(framework.is_running());

    // The same framework instance is reachable through the accessor.
    let again = instance_of::<Framework>().expect("framework singleton");
    assert!(Arc::ptr_eq(&framework, &again));

    // Boot module populated the global registries during initialize.
    let manager = instance_of::<DataManager>().expect("data manager");
    let levels = manager.get_domain::<LevelDomain>().expect("levels domain");
    assert_eq!(levels.store.len(), 3);

    let locator = instance_of::<ServiceLocator>().expect("locator");
    let scene = locator.get::<SceneService>().expect("scene service");

    // Bus round trip across the global instance.
    let bus = instance_of::<EventBus>().expect("bus");
    let observed = Arc::new(AtomicUsize::new(0));
    {
        let observed = Arc::clone(&observed);
        bus.subscribe::<GameStarted>(handler(move |_| {
            observed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));
    }
    assert_eq!(bus.publish(&GameStarted).expect("publish"), 1);
    assert_eq!(observed.load(Ordering::SeqCst), 1);

    // Terminate: modules unwind, registries clear, resurrection blocked.
    framework.terminate();
    assert_eq!(*trace.read(), vec!["boot:init", "boot:down"]);
    assert_eq!(scene.dispose_calls.load(Ordering::SeqCst), 1);
    assert!(!manager.has_domain::<LevelDomain>());
    assert!(!locator.has::<SceneService>());
    assert_eq!(bus.subscriber_count::<GameStarted>(), 0);
    assert!(instance_of::<Framework>().is_none());
    assert!(instance_of::<EventBus>().is_none());
}
