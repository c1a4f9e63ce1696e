//! Entity records and the backing store shared by concrete domains.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::domain::DataError;

/// An identifiable, validatable record owned by a domain.
pub trait DataEntity: Send + Sync {
    /// Identifier, unique within the owning domain.
    fn id(&self) -> u32;

    /// Integrity check; rejected entities never enter an [`EntityStore`].
    fn validate(&self) -> bool;
}

/// Id-keyed record store backing a concrete domain.
///
/// Inserts enforce validity and id uniqueness; iteration is ascending by
/// id, so partially loaded state reads deterministically.
#[derive(Debug)]
pub struct EntityStore<T> {
    entries: RwLock<BTreeMap<u32, T>>,
}

impl<T: DataEntity + Clone> EntityStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Insert a record.
    ///
    /// # Errors
    ///
    /// [`DataError::InvalidEntity`] when `validate()` fails,
    /// [`DataError::DuplicateEntity`] when the id is already present.
    pub fn insert(&self, entity: T) -> Result<(), DataError> {
        let id = entity.id();
        if !entity.validate() {
            return Err(DataError::InvalidEntity { id });
        }

        let mut entries = self.entries.write();
        if entries.contains_key(&id) {
            return Err(DataError::DuplicateEntity { id });
        }
        entries.insert(id, entity);
        Ok(())
    }

    /// Get a record by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<T> {
        self.entries.read().get(&id).cloned()
    }

    /// All records, ascending by id.
    #[must_use]
    pub fn all(&self) -> Vec<T> {
        self.entries.read().values().cloned().collect()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every record.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<T: DataEntity + Clone> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
