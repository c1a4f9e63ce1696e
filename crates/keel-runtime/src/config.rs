//! Framework configuration: core-system toggles and composition options.

use serde::{Deserialize, Serialize};

/// Configuration for the framework.
///
/// Every toggle defaults to `true`. Hosts construct it directly,
/// deserialize it from whatever format they already parse, or pull
/// overrides from the environment with [`FrameworkConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Gate for all framework diagnostic output.
    pub enable_logging: bool,
    /// Bring up the event bus during initialization.
    pub enable_event_bus: bool,
    /// Bring up the service locator during initialization.
    pub enable_service_locator: bool,
    /// Bring up the data manager during initialization.
    pub enable_data_manager: bool,
    /// Run `initialize` automatically at composition time
    /// ([`crate::Framework::bootstrap`]) instead of waiting for an
    /// explicit call.
    pub auto_initialize: bool,
    /// Keep the framework alive across scene/context transitions; when
    /// unset, [`crate::Framework::handle_context_unload`] shuts it down.
    pub persist_across_scenes: bool,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
            enable_event_bus: true,
            enable_service_locator: true,
            enable_data_manager: true,
            auto_initialize: true,
            persist_across_scenes: true,
        }
    }
}

impl FrameworkConfig {
    /// Defaults with environment overrides applied.
    ///
    /// Each toggle reads `KEEL_<NAME>` (e.g. `KEEL_ENABLE_EVENT_BUS`);
    /// `1`/`true` enable, anything else disables, unset keeps the
    /// default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        let overrides: [(&str, &mut bool); 6] = [
            ("KEEL_ENABLE_LOGGING", &mut config.enable_logging),
            ("KEEL_ENABLE_EVENT_BUS", &mut config.enable_event_bus),
            (
                "KEEL_ENABLE_SERVICE_LOCATOR",
                &mut config.enable_service_locator,
            ),
            ("KEEL_ENABLE_DATA_MANAGER", &mut config.enable_data_manager),
            ("KEEL_AUTO_INITIALIZE", &mut config.auto_initialize),
            (
                "KEEL_PERSIST_ACROSS_SCENES",
                &mut config.persist_across_scenes,
            ),
        ];

        for (key, slot) in overrides {
            if let Ok(value) = std::env::var(key) {
                *slot = value == "1" || value.eq_ignore_ascii_case("true");
            }
        }

        config
    }

    /// Whether any of the three core systems is enabled.
    ///
    /// A configuration with all three disabled is accepted but almost
    /// certainly a mistake; `initialize` logs a warning for it.
    #[must_use]
    pub fn any_core_system_enabled(&self) -> bool {
        self.enable_event_bus || self.enable_service_locator || self.enable_data_manager
    }
}
