use anyhow::{anyhow, Result};
use async_trait::async_trait;
use fieldhub::{RemoteConfig, Service};
use fieldhub_core::RemoteDiscovery;
use log::info;
use parking_lot::Mutex;
use std::time::Duration;

pub const BACKEND_SERVICE_ID: &str = "backend";

/// Connection to the remote backend.
///
/// Its start does not complete until a remote endpoint has been discovered
/// (by the config service or `connect_backend`). An optional timeout turns an
/// endless wait into a start failure.
pub struct BackendService {
    discovery: RemoteDiscovery,
    wait_timeout: Option<Duration>,
    connected: Mutex<Option<RemoteConfig>>,
}

impl BackendService {
    pub fn new(discovery: RemoteDiscovery) -> Self {
        Self {
            discovery,
            wait_timeout: None,
            connected: Mutex::new(None),
        }
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }

    /// The remote this service is connected to, if running.
    pub fn connected_to(&self) -> Option<RemoteConfig> {
        self.connected.lock().clone()
    }
}

#[async_trait]
impl Service for BackendService {
    fn id(&self) -> &str {
        BACKEND_SERVICE_ID
    }

    fn display_name(&self) -> &str {
        "Backend Service"
    }

    async fn start(&self) -> Result<()> {
        if self.discovery.current().is_none() {
            info!("Backend: Waiting for a remote endpoint...");
        }
        let remote = match self.wait_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.discovery.wait())
                .await
                .map_err(|_| anyhow!("no remote backend discovered within {:?}", timeout))?,
            None => self.discovery.wait().await,
        };
        info!(
            "Backend: Connected to {} (broker {})",
            remote.http_uri(),
            remote.mqtt_uri()
        );
        *self.connected.lock() = Some(remote);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        *self.connected.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_times_out_without_remote() {
        let backend =
            BackendService::new(RemoteDiscovery::new()).with_wait_timeout(Duration::from_millis(10));
        let err = backend.start().await.unwrap_err();
        assert!(err.to_string().starts_with("no remote backend discovered"));
        assert!(backend.connected_to().is_none());
    }

    #[tokio::test]
    async fn test_connects_once_remote_is_announced() {
        let discovery = RemoteDiscovery::new();
        discovery.announce(RemoteConfig::new("field.example.org"));
        let backend = BackendService::new(discovery);

        backend.start().await.unwrap();
        assert_eq!(backend.connected_to().unwrap().http_host(), "field.example.org");

        backend.stop().await.unwrap();
        assert!(backend.connected_to().is_none());
    }
}
