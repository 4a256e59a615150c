//! Application configuration: stores and the remote backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use fieldhub::{RemoteConfig, Service};
use fieldhub_core::{RemoteDiscovery, StoreCatalog};
use log::info;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const CONFIG_SERVICE_ID: &str = "config";

/// Store catalog shared between the config service (writer) and its readers.
pub type SharedCatalog = Arc<RwLock<StoreCatalog>>;

/// The application config document.
///
/// ```json
/// {
///   "stores": [{ "type": "geojson", "uri": "all.geojson", "uniqueid": "a1" }],
///   "remote": { "http_host": "field.example.org" }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Raw store entries, validated into [`fieldhub::StoreConfig`]s on load.
    #[serde(default)]
    pub stores: Vec<Value>,
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

impl AppConfig {
    /// Reads the document from a JSON file.
    pub async fn read(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read app config {:?}", path))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid app config {:?}", path))
    }
}

/// Where the config service finds the application config.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Inline(AppConfig),
}

/// Loads the application config at start.
///
/// Fills the shared [`StoreCatalog`] and announces the remote backend (if the
/// document has one) on the [`RemoteDiscovery`] channel.
pub struct ConfigService {
    source: ConfigSource,
    catalog: SharedCatalog,
    discovery: RemoteDiscovery,
}

impl ConfigService {
    pub fn new(source: ConfigSource, discovery: RemoteDiscovery) -> Self {
        Self {
            source,
            catalog: Arc::new(RwLock::new(StoreCatalog::new())),
            discovery,
        }
    }

    /// The catalog this service fills. Hand it to the data service.
    pub fn catalog(&self) -> SharedCatalog {
        self.catalog.clone()
    }

    async fn load(&self) -> Result<AppConfig> {
        match &self.source {
            ConfigSource::File(path) => AppConfig::read(path).await,
            ConfigSource::Inline(app) => Ok(app.clone()),
        }
    }
}

#[async_trait]
impl Service for ConfigService {
    fn id(&self) -> &str {
        CONFIG_SERVICE_ID
    }

    fn display_name(&self) -> &str {
        "Config Service"
    }

    async fn start(&self) -> Result<()> {
        let app = self.load().await?;
        let catalog = StoreCatalog::from_structured_list(&app.stores)
            .context("Invalid store configuration")?;
        info!("Config: Loaded {} store configs", catalog.len());
        *self.catalog.write() = catalog;

        if let Some(remote) = app.remote {
            self.discovery.announce(remote);
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        *self.catalog.write() = StoreCatalog::new();
        Ok(())
    }
}
