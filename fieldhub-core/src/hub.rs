//! The orchestrator facade handed to the rest of the application.

use crate::config::HubConfig;
use crate::discovery::RemoteDiscovery;
use crate::error::{ConnectError, Result};
use crate::event_bus::{EventBus, Subscription};
use crate::identity::DeviceIdentity;
use crate::lifecycle::{BatchReport, LifecycleController, RestartReport};
use crate::query::{RunningWait, ServiceRunningQuery};
use fieldhub::{RemoteConfig, Service, ServiceDescriptor, ServiceStatus};
use log::info;
use std::sync::Arc;

/// Owns the services, the status bus and the device identity.
///
/// Construct one per application and pass clones around: every clone drives the
/// same registry and publishes on the same bus.
///
/// # Example
///
/// ```ignore
/// let hub = FieldHub::new(HubConfig::default())?;
/// hub.add_service(Arc::new(MyService::new()))?;
/// let ready = hub.service_running("my-service");
/// hub.start_all_services().await;
/// ready.wait().await?;
/// ```
#[derive(Clone)]
pub struct FieldHub {
    controller: LifecycleController,
    query: ServiceRunningQuery,
    discovery: RemoteDiscovery,
    identity: Arc<DeviceIdentity>,
    config: Arc<HubConfig>,
}

impl FieldHub {
    /// Builds a hub from its configuration.
    ///
    /// # Errors
    ///
    /// * [`ConnectError::Identity`] if `data_dir` is set and the identity cannot be loaded.
    pub fn new(config: HubConfig) -> Result<Self> {
        let identity = match &config.data_dir {
            Some(dir) => DeviceIdentity::load_or_create(dir)?,
            None => DeviceIdentity::ephemeral(),
        };
        let event_bus = EventBus::new();
        let controller =
            LifecycleController::new(event_bus.clone()).with_stop_order(config.stop_order());
        info!("Hub: Created (device {})", identity.install_id());

        Ok(Self {
            controller,
            query: ServiceRunningQuery::new(event_bus),
            discovery: RemoteDiscovery::new(),
            identity: Arc::new(identity),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    // --- Services ---

    pub fn add_service(&self, service: Arc<dyn Service>) -> Result<()> {
        self.controller.add_service(service)
    }

    /// Stops (if needed) and removes a service.
    pub async fn remove_service(&self, id: &str) -> Result<()> {
        self.controller.remove_service(id).await
    }

    pub fn service_by_id(&self, id: &str) -> Result<Arc<dyn Service>> {
        self.controller.service(id)
    }

    pub fn service_status(&self, id: &str) -> Result<ServiceStatus> {
        self.controller.status(id)
    }

    /// Descriptors of every registered service, in registration order.
    pub fn services(&self) -> Vec<ServiceDescriptor> {
        self.controller.registry().read().descriptors()
    }

    pub async fn start_service(&self, id: &str) -> Result<()> {
        self.controller.start_service(id).await
    }

    pub async fn stop_service(&self, id: &str) -> Result<()> {
        self.controller.stop_service(id).await
    }

    pub async fn restart_service(&self, id: &str) -> Result<()> {
        self.controller.restart_service(id).await
    }

    pub async fn start_all_services(&self) -> BatchReport {
        self.controller.start_all_services().await
    }

    pub async fn stop_all_services(&self) -> BatchReport {
        self.controller.stop_all_services().await
    }

    pub async fn restart_all_services(&self) -> RestartReport {
        self.controller.restart_all_services().await
    }

    // --- Backend ---

    /// Registers the remote backend.
    ///
    /// The endpoint is announced to whoever waits on [`FieldHub::discovery`]; if
    /// the configured backend service is registered and idle, it is started.
    pub async fn connect_backend(&self, remote: RemoteConfig) -> Result<()> {
        self.discovery.announce(remote);
        let Some(backend) = self.config.backend_service.as_deref() else {
            return Ok(());
        };
        match self.controller.status(backend) {
            Ok(status) if status.needs_start() => self.controller.start_service(backend).await,
            Ok(_) => Ok(()),
            Err(ConnectError::NotFound(_)) => {
                info!("Hub: No '{}' service registered, remote only announced", backend);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn discovery(&self) -> &RemoteDiscovery {
        &self.discovery
    }

    // --- Observation ---

    /// Stable per-install UUID.
    pub fn device_identifier(&self) -> &str {
        self.identity.install_id()
    }

    /// Waits for `id` to be running. See [`ServiceRunningQuery::wait_for_running`].
    pub fn service_running(&self, id: &str) -> RunningWait {
        self.query.wait_for_running(id)
    }

    /// Every status event published from now on.
    pub fn events(&self) -> Subscription {
        self.controller.event_bus().subscribe_all()
    }

    pub fn event_bus(&self) -> &EventBus {
        self.controller.event_bus()
    }
}
