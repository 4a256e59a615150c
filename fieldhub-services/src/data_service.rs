use crate::config_service::SharedCatalog;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fieldhub::{Service, StoreConfig};
use log::{info, warn};
use parking_lot::Mutex;

pub const DATA_SERVICE_ID: &str = "data";

/// Store types the data service knows how to open.
pub const SUPPORTED_STORE_TYPES: &[&str] = &["geojson", "gpkg", "wfs"];

/// Serves the stores of the shared catalog while running.
///
/// The catalog is read on every access, so stores loaded by the config service
/// after this service started are visible. Stores of an unsupported type are
/// never served.
pub struct DataService {
    catalog: SharedCatalog,
    started_at: Mutex<Option<DateTime<Utc>>>,
}

impl DataService {
    pub fn new(catalog: SharedCatalog) -> Self {
        Self {
            catalog,
            started_at: Mutex::new(None),
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        *self.started_at.lock()
    }

    /// Stores currently served, in catalog order. Empty while stopped.
    pub fn stores(&self) -> Vec<StoreConfig> {
        if self.started_at().is_none() {
            return Vec::new();
        }
        self.catalog
            .read()
            .stores()
            .iter()
            .filter(|s| is_supported(s))
            .cloned()
            .collect()
    }

    pub fn store(&self, unique_id: &str) -> Option<StoreConfig> {
        self.started_at()?;
        self.catalog
            .read()
            .get(unique_id)
            .filter(|s| is_supported(s))
            .cloned()
    }
}

fn is_supported(store: &StoreConfig) -> bool {
    SUPPORTED_STORE_TYPES.contains(&store.store_type())
}

#[async_trait]
impl Service for DataService {
    fn id(&self) -> &str {
        DATA_SERVICE_ID
    }

    fn display_name(&self) -> &str {
        "Data Service"
    }

    async fn start(&self) -> Result<()> {
        for store in self.catalog.read().stores() {
            if is_supported(store) {
                info!("Data: Opening store '{}' at {}", store.unique_id(), store.uri());
            } else {
                warn!(
                    "Data: Skipping store '{}' of unsupported type '{}'",
                    store.unique_id(),
                    store.store_type()
                );
            }
        }
        *self.started_at.lock() = Some(Utc::now());
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        *self.started_at.lock() = None;
        Ok(())
    }
}
