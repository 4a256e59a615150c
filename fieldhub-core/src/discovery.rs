//! Hand-over of the remote backend endpoint.
//!
//! The config service (or `connect_backend`) announces the remote; the backend
//! service waits for it inside its own `start`. The lifecycle controller is not
//! involved: it only ever sees the backend's start taking a while.

use fieldhub::RemoteConfig;
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

/// A watch channel carrying the most recently discovered remote endpoint.
#[derive(Clone)]
pub struct RemoteDiscovery {
    sender: Arc<watch::Sender<Option<RemoteConfig>>>,
}

impl RemoteDiscovery {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publishes `remote`, waking every pending [`RemoteDiscovery::wait`].
    pub fn announce(&self, remote: RemoteConfig) {
        info!("Discovery: Remote endpoint at {}", remote.http_uri());
        self.sender.send_replace(Some(remote));
    }

    /// The endpoint discovered so far, if any.
    pub fn current(&self) -> Option<RemoteConfig> {
        self.sender.borrow().clone()
    }

    /// Resolves as soon as an endpoint is known (immediately if it already is).
    pub async fn wait(&self) -> RemoteConfig {
        let mut receiver = self.sender.subscribe();
        loop {
            if let Some(remote) = receiver.borrow_and_update().clone() {
                return remote;
            }
            // `self` keeps the sender alive, so the channel cannot close here.
            if receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Forgets the endpoint (e.g. on logout).
    pub fn reset(&self) {
        self.sender.send_replace(None);
    }
}

impl Default for RemoteDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
