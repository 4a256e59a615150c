//! "Is service X running yet?" without polling.

use crate::error::{ConnectError, Result};
use crate::event_bus::{EventBus, Subscription};
use fieldhub::{ServiceStatus, ServiceStatusEvent};

/// Derived view over the [`EventBus`] answering "is this service running?".
#[derive(Clone)]
pub struct ServiceRunningQuery {
    event_bus: EventBus,
}

impl ServiceRunningQuery {
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Starts waiting for `id` to reach `RUNNING`.
    ///
    /// The subscription is taken immediately, so a transition happening between
    /// this call and the first poll of the returned handle is not missed.
    /// If the service already is `RUNNING` the handle resolves at once; if it is
    /// in `ERROR` the handle fails at once.
    ///
    /// No timeout is applied. Wrap [`RunningWait::wait`] in
    /// `tokio::time::timeout` when one is needed.
    pub fn wait_for_running(&self, id: &str) -> RunningWait {
        RunningWait {
            id: id.to_string(),
            subscription: self.event_bus.subscribe_and_replay(id),
            done: false,
        }
    }
}

/// Handle of a single wait for a service to reach `RUNNING`.
///
/// Yields exactly one item (the `RUNNING` event or the failure) and then
/// completes. Issue a new query to observe later transitions, e.g. after a restart.
pub struct RunningWait {
    id: String,
    subscription: Subscription,
    done: bool,
}

impl RunningWait {
    pub fn service_id(&self) -> &str {
        &self.id
    }

    /// Next terminal outcome, or `None` once one has already been delivered.
    pub async fn next(&mut self) -> Option<Result<ServiceStatusEvent>> {
        if self.done {
            return None;
        }
        loop {
            let Some(event) = self.subscription.recv().await else {
                self.finish();
                return Some(Err(ConnectError::BusClosed(self.id.clone())));
            };
            match event.status() {
                ServiceStatus::Running => {
                    self.finish();
                    return Some(Ok(event));
                }
                ServiceStatus::Error => {
                    self.finish();
                    let reason = event.error().unwrap_or("unknown error").to_string();
                    return Some(Err(ConnectError::ServiceFailed {
                        id: self.id.clone(),
                        reason,
                    }));
                }
                _ => continue,
            }
        }
    }

    /// Resolves with the `RUNNING` event, or the error that prevented it.
    pub async fn wait(mut self) -> Result<ServiceStatusEvent> {
        match self.next().await {
            Some(outcome) => outcome,
            None => Err(ConnectError::BusClosed(self.id.clone())),
        }
    }

    /// Drops the underlying subscription without waiting.
    pub fn cancel(&mut self) {
        self.finish();
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn finish(&mut self) {
        self.done = true;
        self.subscription.cancel();
    }
}
