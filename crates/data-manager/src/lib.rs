//! # Data Manager
//!
//! Type-keyed registry of data-processing units ("domains") with a
//! one-shot bulk-load trigger.
//!
//! A domain owns a collection of identifiable, validatable records and
//! knows how to load them. Domains are registered with the [`DataManager`]
//! and loaded together once via [`DataManager::load_all`]:
//!
//! - loading walks domains in registration order;
//! - one domain's load failure is caught and logged and does not abort
//!   the rest of the batch (fault isolation);
//! - a second `load_all` after the registry is marked loaded is a no-op
//!   until [`DataManager::clear`] resets the flag.

pub mod domain;
pub mod entity;
pub mod manager;

pub use domain::{DataError, Domain};
pub use entity::{DataEntity, EntityStore};
pub use manager::{DataManager, LoadReport};
