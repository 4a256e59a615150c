//! The set of store configurations known to the system.

use crate::error::{ConnectError, Result};
use fieldhub::StoreConfig;
use serde_json::Value;

/// Insertion-ordered collection of [`StoreConfig`]s.
///
/// This is where `uniqueid` uniqueness is enforced; the value object itself
/// knows nothing about its siblings.
#[derive(Debug, Clone, Default)]
pub struct StoreCatalog {
    stores: Vec<StoreConfig>,
}

impl StoreCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and inserts every entry of a structured list.
    ///
    /// Stops at the first invalid or duplicated entry.
    pub fn from_structured_list(items: &[Value]) -> Result<Self> {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(StoreConfig::from_value(item)?)?;
        }
        Ok(catalog)
    }

    /// # Errors
    ///
    /// * [`ConnectError::DuplicateStore`] if a store with the same `uniqueid` exists.
    pub fn insert(&mut self, config: StoreConfig) -> Result<()> {
        if self.get(config.unique_id()).is_some() {
            return Err(ConnectError::DuplicateStore(config.unique_id().to_string()));
        }
        self.stores.push(config);
        Ok(())
    }

    pub fn remove(&mut self, unique_id: &str) -> Option<StoreConfig> {
        let index = self.stores.iter().position(|s| s.unique_id() == unique_id)?;
        Some(self.stores.remove(index))
    }

    pub fn get(&self, unique_id: &str) -> Option<&StoreConfig> {
        self.stores.iter().find(|s| s.unique_id() == unique_id)
    }

    pub fn stores(&self) -> &[StoreConfig] {
        &self.stores
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
