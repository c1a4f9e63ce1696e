//! The domain contract and data-layer errors.

use std::any::Any;

use thiserror::Error;

/// Errors from the data layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    /// No domain is registered under the requested type key.
    #[error("domain {type_name} is not registered")]
    DomainNotFound {
        /// The requested domain type.
        type_name: &'static str,
    },

    /// A domain's load routine failed.
    #[error("failed to load domain {domain}: {reason}")]
    LoadFailed {
        /// Name of the failing domain.
        domain: String,
        /// Human-readable failure reason.
        reason: String,
    },

    /// An entity failed its validity check on insert.
    #[error("entity {id} failed validation")]
    InvalidEntity {
        /// Identifier of the rejected entity.
        id: u32,
    },

    /// An entity id is already present in the store.
    #[error("duplicate entity id {id}")]
    DuplicateEntity {
        /// The colliding identifier.
        id: u32,
    },
}

/// A data-processing unit owning a collection of records.
///
/// Concrete domains typically hold an [`crate::EntityStore`] and expose
/// typed accessors over it; the registry only needs the name and the load
/// routine. `load_data` is invoked once per [`crate::DataManager::load_all`]
/// cycle; implementations parse their source, validate records and fill
/// their store.
pub trait Domain: Any + Send + Sync {
    /// Unique human-readable name, used in diagnostics and load reports.
    fn name(&self) -> &str;

    /// Load and process this domain's data.
    ///
    /// # Errors
    ///
    /// [`DataError::LoadFailed`] (or a more specific variant) when the
    /// source cannot be read or parsed. The failure is contained by the
    /// caller; other domains still load.
    fn load_data(&self) -> Result<(), DataError>;
}
