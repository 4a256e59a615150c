use anyhow::Result;
use async_trait::async_trait;

/// The contract of a pluggable subsystem (data, sensors, config, auth, backend, cache...).
///
/// Implement this for every service you want the orchestrator to drive.
/// Do not call `start`/`stop` yourself on a registered service: go through the
/// orchestrator so the status is tracked and published.
#[async_trait]
pub trait Service: Send + Sync {
    /// Stable, unique identifier (e.g. "config", "backend").
    fn id(&self) -> &str;

    /// Human readable name. Defaults to the identifier.
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Brings the service up.
    ///
    /// The future may perform any asynchronous work (I/O, waiting on another
    /// subsystem). It resolves once the service is usable or has failed.
    async fn start(&self) -> Result<()>;

    /// Tears the service down. Should release everything acquired in `start`.
    async fn stop(&self) -> Result<()>;
}
