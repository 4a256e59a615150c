use crate::auth_service::{AuthService, Credentials};
use crate::backend_service::BackendService;
use crate::cache_service::CacheService;
use crate::config_service::{ConfigService, ConfigSource};
use crate::data_service::DataService;
use crate::sensor_service::SensorService;
use fieldhub::Service;
use fieldhub_core::{FieldHub, RemoteDiscovery};
use std::sync::Arc;
use std::time::Duration;

/// The standard service set of a field application.
///
/// Every handle is shared with the hub once registered, so callers can keep
/// using the typed services (`sensor.record_fix`, `cache.put` …) directly.
pub struct StandardServices {
    pub data: Arc<DataService>,
    pub sensor: Arc<SensorService>,
    pub config: Arc<ConfigService>,
    pub auth: Arc<AuthService>,
    pub cache: Arc<CacheService>,
    pub backend: Arc<BackendService>,
}

impl StandardServices {
    /// Builds the services around one discovery channel.
    ///
    /// Pass [`FieldHub::discovery`] so that `connect_backend` reaches the backend.
    pub fn new(source: ConfigSource, discovery: &RemoteDiscovery) -> Self {
        let config = ConfigService::new(source, discovery.clone());
        Self {
            data: Arc::new(DataService::new(config.catalog())),
            sensor: Arc::new(SensorService::new()),
            config: Arc::new(config),
            auth: Arc::new(AuthService::new()),
            cache: Arc::new(CacheService::default()),
            backend: Arc::new(BackendService::new(discovery.clone())),
        }
    }

    /// Same as [`StandardServices::new`], bounding the backend's wait for a remote.
    pub fn with_backend_timeout(
        source: ConfigSource,
        discovery: &RemoteDiscovery,
        timeout: Duration,
    ) -> Self {
        let mut services = Self::new(source, discovery);
        services.backend = Arc::new(BackendService::new(discovery.clone()).with_wait_timeout(timeout));
        services
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        self.auth.set_credentials(credentials);
        self
    }

    /// All six, in registration order: data, sensor, config, auth, cache, backend.
    pub fn all(&self) -> Vec<Arc<dyn Service>> {
        vec![
            self.data.clone(),
            self.sensor.clone(),
            self.config.clone(),
            self.auth.clone(),
            self.cache.clone(),
            self.backend.clone(),
        ]
    }

    /// Registers every service on `hub`. Stops at the first duplicate id.
    pub fn register(&self, hub: &FieldHub) -> fieldhub_core::Result<()> {
        for service in self.all() {
            hub.add_service(service)?;
        }
        Ok(())
    }
}
