//! # Event Bus
//!
//! The single place where service status transitions are announced.
//!
//! ## Purpose
//! The controller never calls observers directly. It publishes a
//! [`ServiceStatusEvent`] and every interested component subscribes.
//!
//! ## Multicast with replay
//! 1. **Multicast**: a transition is published once and fanned out to every
//!    subscriber's own queue, however many there are.
//! 2. **Replay**: the bus remembers the last event per service id, so a late
//!    subscriber can be told the current status without having listened at
//!    publish time.

use fieldhub::{ServiceStatus, ServiceStatusEvent};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TryRecvError};

type Predicate = Box<dyn Fn(&ServiceStatusEvent) -> bool + Send + Sync>;

struct Subscriber {
    predicate: Predicate,
    sender: mpsc::UnboundedSender<ServiceStatusEvent>,
}

#[derive(Default)]
struct BusState {
    last_known: HashMap<String, ServiceStatusEvent>,
    subscribers: Vec<Subscriber>,
}

impl BusState {
    fn prune(&mut self) {
        self.subscribers.retain(|s| !s.sender.is_closed());
    }
}

/// Status fan-out plus a last-known-status cache.
///
/// Every subscriber owns an unbounded queue: a slow subscriber never loses an
/// event and never slows the publisher down. Cloning is cheap and every clone
/// publishes to the same subscribers.
///
/// # Examples
///
/// ```
/// use fieldhub::{ServiceStatus, ServiceStatusEvent};
/// use fieldhub_core::event_bus::EventBus;
///
/// let bus = EventBus::new();
/// bus.publish(ServiceStatusEvent::new("config", ServiceStatus::Running));
/// assert_eq!(bus.last_status("config"), Some(ServiceStatus::Running));
/// ```
#[derive(Clone, Default)]
pub struct EventBus {
    state: Arc<Mutex<BusState>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the event as the last known status of its service and
    /// delivers it to every current subscriber whose predicate matches.
    pub fn publish(&self, event: ServiceStatusEvent) {
        // Cache update and fan-out happen under one lock so that
        // `subscribe_and_replay` sees either the cached event or the live one,
        // never both or neither.
        let mut state = self.state.lock();
        debug!("EventBus: {}", event);
        state
            .last_known
            .insert(event.service_id().to_string(), event.clone());
        // A failed send means the subscription was dropped.
        state
            .subscribers
            .retain(|s| !(s.predicate)(&event) || s.sender.send(event.clone()).is_ok());
    }

    /// Subscribes to every future event matching `predicate`.
    pub fn subscribe<F>(&self, predicate: F) -> Subscription
    where
        F: Fn(&ServiceStatusEvent) -> bool + Send + Sync + 'static,
    {
        let mut state = self.state.lock();
        Self::register(&mut state, Box::new(predicate), None)
    }

    /// Subscribes to every future event.
    pub fn subscribe_all(&self) -> Subscription {
        self.subscribe(|_| true)
    }

    /// Subscribes to the events of `id`, delivering the cached last event first.
    ///
    /// The replayed event (if any) is returned by the first `recv` before any
    /// live event published after this call.
    pub fn subscribe_and_replay(&self, id: &str) -> Subscription {
        let mut state = self.state.lock();
        let replay = state.last_known.get(id).cloned();
        let id = id.to_string();
        Self::register(
            &mut state,
            Box::new(move |event| event.service_id() == id),
            replay,
        )
    }

    fn register(
        state: &mut BusState,
        predicate: Predicate,
        replay: Option<ServiceStatusEvent>,
    ) -> Subscription {
        let (sender, receiver) = mpsc::unbounded_channel();
        if let Some(event) = replay {
            // The receiver is alive, this cannot fail.
            let _ = sender.send(event);
        }
        state.prune();
        state.subscribers.push(Subscriber { predicate, sender });
        Subscription {
            receiver: Some(receiver),
        }
    }

    pub fn last_event(&self, id: &str) -> Option<ServiceStatusEvent> {
        self.state.lock().last_known.get(id).cloned()
    }

    pub fn last_status(&self, id: &str) -> Option<ServiceStatus> {
        self.state
            .lock()
            .last_known
            .get(id)
            .map(ServiceStatusEvent::status)
    }

    /// Drops the cached status of `id` (used when a service is removed).
    pub fn forget(&self, id: &str) {
        self.state.lock().last_known.remove(id);
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        let mut state = self.state.lock();
        state.prune();
        state.subscribers.len()
    }
}

/// A filtered view on the bus.
///
/// Dropping the subscription or calling [`Subscription::cancel`] stops delivery.
/// Neither has any effect on the publisher or on other subscribers.
pub struct Subscription {
    receiver: Option<mpsc::UnboundedReceiver<ServiceStatusEvent>>,
}

impl Subscription {
    /// Waits for the next matching event.
    ///
    /// Returns `None` once cancelled or when every handle on the bus has been
    /// dropped. Cancel safe: dropping the future does not lose an event.
    pub async fn recv(&mut self) -> Option<ServiceStatusEvent> {
        let receiver = self.receiver.as_mut()?;
        match receiver.recv().await {
            Some(event) => Some(event),
            None => {
                self.receiver = None;
                None
            }
        }
    }

    /// Returns the next matching event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ServiceStatusEvent> {
        let receiver = self.receiver.as_mut()?;
        match receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.receiver = None;
                None
            }
        }
    }

    /// Stops delivery. Safe to call at any time, any number of times.
    pub fn cancel(&mut self) {
        self.receiver = None;
    }

    pub fn is_cancelled(&self) -> bool {
        self.receiver.is_none()
    }
}
