//! # Keel Runtime
//!
//! The composition layer of the Keel framework.
//!
//! The [`Framework`] orchestrator owns a priority-ordered collection of
//! feature [`Module`]s and composes the three core systems (event bus,
//! service locator, data manager), each reached through the shared
//! lazy-singleton accessor and gated by [`FrameworkConfig`] toggles.
//!
//! Control flow: `initialize` brings up the core systems, then modules in
//! ascending priority order; each `on_tick` fans out to every module; on
//! `shutdown` modules unwind in the exact reverse of the realized
//! initialization order, then the core systems are cleared (dependents
//! before dependencies).
//!
//! One external driver (a cooperative per-frame loop) is expected to call
//! `initialize`, `on_tick` and `shutdown` sequentially; nothing here
//! suspends or blocks.

pub mod config;
pub mod framework;
pub mod module;

pub use config::FrameworkConfig;
pub use framework::{Framework, FrameworkError, FrameworkState};
pub use module::Module;
