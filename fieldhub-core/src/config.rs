use crate::error::Result;
use crate::lifecycle::StopOrder;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix of the environment variables overriding the file (`FIELDHUB_LOG_LEVEL`...).
pub const ENV_PREFIX: &str = "FIELDHUB";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HubConfig {
    pub log_level: String,

    /// Where the device identity is persisted. `None` keeps it in memory.
    pub data_dir: Option<PathBuf>,

    /// Id of the service `connect_backend` starts once a remote is known.
    pub backend_service: Option<String>,

    /// Stop in reverse registration order instead of registration order.
    pub reverse_stop_order: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            data_dir: None,
            backend_service: Some("backend".to_string()),
            reverse_stop_order: false,
        }
    }
}

impl HubConfig {
    /// Loads the configuration from an optional file (TOML, JSON, YAML... by
    /// extension) overridden by `FIELDHUB_*` environment variables.
    ///
    /// Missing keys keep their default value.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    pub fn stop_order(&self) -> StopOrder {
        if self.reverse_stop_order {
            StopOrder::Reverse
        } else {
            StopOrder::Registration
        }
    }
}
