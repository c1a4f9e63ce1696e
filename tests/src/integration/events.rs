//! Event-bus semantics driven from framework modules: modules that
//! publish on tick and services that subscribe on initialize.

use std::sync::Arc;

use parking_lot::RwLock;

use event_bus::{handler, Event, EventBus, Handler, HandlerError};
use keel_runtime::{Framework, FrameworkConfig, Module};

#[derive(Debug)]
struct DamageTaken {
    amount: u32,
}
impl Event for DamageTaken {}

/// Module publishing a fixed event every tick onto a shared bus.
struct Attacker {
    bus: Arc<EventBus>,
}

impl Module for Attacker {
    fn name(&self) -> &str {
        "attacker"
    }

    fn priority(&self) -> i32 {
        1
    }

    fn on_update(&self) {
        let _ = self.bus.publish(&DamageTaken { amount: 3 });
    }
}

fn isolated_framework() -> Framework {
    let framework = Framework::new();
    framework.configure(FrameworkConfig {
        enable_event_bus: false,
        enable_service_locator: false,
        enable_data_manager: false,
        auto_initialize: false,
        ..FrameworkConfig::default()
    });
    framework
}

#[test]
fn test_module_publishes_and_both_subscribers_observe_in_order() {
    let bus = Arc::new(EventBus::new());
    let seen: Arc<RwLock<Vec<(u8, u32)>>> = Arc::default();

    for tag in [1u8, 2u8] {
        let seen = Arc::clone(&seen);
        bus.subscribe::<DamageTaken>(handler(move |event: &DamageTaken| {
            seen.write().push((tag, event.amount));
            Ok(())
        }));
    }

    let framework = isolated_framework();
    framework.register_module(Arc::new(Attacker {
        bus: Arc::clone(&bus),
    }));
    framework.initialize().unwrap();
    framework.on_tick();

    assert_eq!(*seen.read(), vec![(1, 3), (2, 3)]);
}

#[test]
fn test_handler_removed_during_dispatch_misses_only_future_ticks() {
    let bus = Arc::new(EventBus::new());
    let seen: Arc<RwLock<Vec<u8>>> = Arc::default();

    let second: Handler<DamageTaken> = {
        let seen = Arc::clone(&seen);
        handler(move |_| {
            seen.write().push(2);
            Ok(())
        })
    };
    let first: Handler<DamageTaken> = {
        let bus = Arc::clone(&bus);
        let seen = Arc::clone(&seen);
        let second = Arc::clone(&second);
        handler(move |_| {
            seen.write().push(1);
            bus.unsubscribe(&second);
            Ok(())
        })
    };

    bus.subscribe(first);
    bus.subscribe(Arc::clone(&second));

    let framework = isolated_framework();
    framework.register_module(Arc::new(Attacker {
        bus: Arc::clone(&bus),
    }));
    framework.initialize().unwrap();

    framework.on_tick();
    // Snapshot dispatch: the removed handler still saw the in-flight event.
    assert_eq!(*seen.read(), vec![1, 2]);

    framework.on_tick();
    assert_eq!(*seen.read(), vec![1, 2, 1]);
}

#[test]
fn test_failing_subscriber_stops_dispatch_but_not_the_bus() {
    let bus = Arc::new(EventBus::new());
    let seen: Arc<RwLock<Vec<u8>>> = Arc::default();

    bus.subscribe::<DamageTaken>(handler(|_| Err(HandlerError::new("handler down"))));
    {
        let seen = Arc::clone(&seen);
        bus.subscribe::<DamageTaken>(handler(move |_| {
            seen.write().push(9);
            Ok(())
        }));
    }

    // First publish aborts at the failing handler.
    assert!(bus.publish(&DamageTaken { amount: 1 }).is_err());
    assert!(seen.read().is_empty());

    // The bus itself stays functional for later publishes.
    assert!(bus.publish(&DamageTaken { amount: 2 }).is_err());
    assert_eq!(bus.subscriber_count::<DamageTaken>(), 2);
}
