//! # Keel
//!
//! Minimal composition root for the Keel framework.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment (`KEEL_*` toggles)
//! 2. Install the tracing subscriber
//! 3. Bootstrap the framework singleton (auto-initialize honored)
//! 4. Register demo modules and drive a fixed-rate tick loop
//! 5. Terminate: reverse-order module shutdown, core-system teardown,
//!    singleton resurrection guard raised

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use keel_runtime::{Framework, FrameworkConfig, Module};

/// Tick period of the demo driver loop (~60 Hz).
const TICK_PERIOD: Duration = Duration::from_millis(16);

/// Ticks to run before shutting down.
const DEMO_TICKS: u64 = 300;

/// Demo module: counts ticks and reports once per second.
struct Heartbeat {
    ticks: AtomicU64,
}

impl Heartbeat {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            ticks: AtomicU64::new(0),
        })
    }
}

impl Module for Heartbeat {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn on_update(&self) {
        let ticks = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if ticks % 60 == 0 {
            info!(ticks, "heartbeat");
        }
    }
}

fn main() -> Result<()> {
    let config = FrameworkConfig::from_env();
    if config.enable_logging {
        let _ = keel_telemetry::init("info");
    }

    let framework = Framework::bootstrap(config)?;
    if !framework.is_running() {
        framework.initialize()?;
    }

    framework.register_module(Heartbeat::new());

    info!("keel running; driving {DEMO_TICKS} ticks");
    for _ in 0..DEMO_TICKS {
        framework.on_tick();
        std::thread::sleep(TICK_PERIOD);
    }

    framework.terminate();
    Ok(())
}
