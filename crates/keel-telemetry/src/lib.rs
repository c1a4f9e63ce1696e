//! # Keel Telemetry
//!
//! Leveled diagnostic logging for the Keel framework, built on `tracing`.
//!
//! All framework output goes through the [`log_info!`], [`log_warn!`] and
//! [`log_error!`] macros, gated by a single process-wide enabled flag (see
//! [`set_enabled`]). Info and Warning output is compiled out entirely in
//! release builds; Error output is always compiled in.
//!
//! ## Usage
//!
//! ```rust
//! use keel_telemetry::{init, log_info};
//!
//! let _ = init("info");
//! log_info!("framework starting");
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `RUST_LOG` | crate default | Overrides the filter passed to [`init`] |

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

// Macro plumbing: the log_* macros expand in downstream crates and need a
// stable path to the tracing macros.
#[doc(hidden)]
pub use tracing as __tracing;

/// Log level for the framework's diagnostic surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Informational messages for normal operation.
    Info,
    /// Warning messages for potential issues.
    Warning,
    /// Error messages for failures.
    Error,
}

/// Telemetry initialization errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global `tracing` subscriber is already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Global gate for all framework diagnostics.
static ENABLED: AtomicBool = AtomicBool::new(true);

/// Enable or disable all framework diagnostic output.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::SeqCst);
}

/// Whether framework diagnostic output is currently enabled.
#[must_use]
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::SeqCst)
}

/// Install the global `tracing` subscriber with an env-filter.
///
/// `default_filter` is used when `RUST_LOG` is unset. Returns
/// [`TelemetryError::AlreadyInitialized`] if a subscriber is already set;
/// callers that merely want logging to be available may ignore that.
pub fn init(default_filter: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| TelemetryError::AlreadyInitialized(e.to_string()))
}

/// Log a message at the given level through the framework gate.
pub fn log(level: LogLevel, message: &str) {
    if !is_enabled() {
        return;
    }
    match level {
        LogLevel::Info => {
            if cfg!(debug_assertions) {
                tracing::info!("{message}");
            }
        }
        LogLevel::Warning => {
            if cfg!(debug_assertions) {
                tracing::warn!("{message}");
            }
        }
        LogLevel::Error => tracing::error!("{message}"),
    }
}

/// Log an informational message. Compiled out in release builds.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) && $crate::is_enabled() {
            $crate::__tracing::info!($($arg)*);
        }
    };
}

/// Log a warning. Compiled out in release builds.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) && $crate::is_enabled() {
            $crate::__tracing::warn!($($arg)*);
        }
    };
}

/// Log an error. Always compiled in, still gated by the enabled flag.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if $crate::is_enabled() {
            $crate::__tracing::error!($($arg)*);
        }
    };
}
