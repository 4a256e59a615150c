use crate::error::{ConnectError, Result};
use crate::event_bus::EventBus;
use crate::registry::ServiceRegistry;
use fieldhub::{Service, ServiceStatus, ServiceStatusEvent};
use log::{error, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Order in which `stop_all_services` walks the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopOrder {
    /// Same order as registration (and start).
    #[default]
    Registration,
    /// Reverse registration order. Opt-in alternative.
    Reverse,
}

/// Outcome of one service inside a batch operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceOutcome {
    pub id: String,
    pub status: ServiceStatus,
    pub error: Option<String>,
}

impl ServiceOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-service outcomes of a batch operation, in the order they were attempted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    outcomes: Vec<ServiceOutcome>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[ServiceOutcome] {
        &self.outcomes
    }

    pub fn failures(&self) -> impl Iterator<Item = &ServiceOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(ServiceOutcome::is_success)
    }

    fn push(&mut self, id: String, status: ServiceStatus, error: Option<String>) {
        self.outcomes.push(ServiceOutcome { id, status, error });
    }
}

/// Outcomes of `restart_all_services`: the stop pass, then the start pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RestartReport {
    pub stopped: BatchReport,
    pub started: BatchReport,
}

/// Drives start/stop/restart of the registered services.
///
/// Every transition is applied to the registry under its write lock and then
/// published on the [`EventBus`]. The lock is never held while a service's own
/// `start`/`stop` future runs.
///
/// The controller knows nothing about dependencies between services: the only
/// ordering it provides is the registration order.
#[derive(Clone)]
pub struct LifecycleController {
    registry: Arc<RwLock<ServiceRegistry>>,
    event_bus: EventBus,
    stop_order: StopOrder,
}

/// What to do after looking at the current status.
enum Step {
    /// Nothing to do, the request is already satisfied (or in flight).
    Skip(ServiceStatus),
    /// Transition applied and published, invoke the service.
    Run(Arc<dyn Service>),
}

impl LifecycleController {
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            registry: Arc::new(RwLock::new(ServiceRegistry::new())),
            event_bus,
            stop_order: StopOrder::default(),
        }
    }

    pub fn with_stop_order(mut self, stop_order: StopOrder) -> Self {
        self.stop_order = stop_order;
        self
    }

    pub fn registry(&self) -> &Arc<RwLock<ServiceRegistry>> {
        &self.registry
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    // --- Registration ---

    pub fn add_service(&self, service: Arc<dyn Service>) -> Result<()> {
        let id = service.id().to_string();
        self.registry.write().add(service)?;
        info!("Lifecycle: Registered service '{}'", id);
        Ok(())
    }

    /// Stops the service if needed, then removes it.
    ///
    /// A stop failure is published (and logged) but does not prevent removal.
    pub async fn remove_service(&self, id: &str) -> Result<()> {
        let status = self.registry.read().status(id)?;
        if status.needs_stop() {
            if let Err(e) = self.stop_service(id).await {
                warn!("Lifecycle: Removing '{}' despite stop failure: {}", id, e);
            }
        }
        self.registry.write().remove(id)?;
        self.event_bus.forget(id);
        info!("Lifecycle: Removed service '{}'", id);
        Ok(())
    }

    pub fn service(&self, id: &str) -> Result<Arc<dyn Service>> {
        self.registry.read().get(id).map(|e| e.service().clone())
    }

    pub fn status(&self, id: &str) -> Result<ServiceStatus> {
        self.registry.read().status(id)
    }

    // --- Single service ---

    /// Starts one service.
    ///
    /// Idempotent: a service already `RUNNING` or `STARTING` is left alone and no
    /// event is published.
    ///
    /// # Errors
    ///
    /// * [`ConnectError::NotFound`] if `id` is unknown.
    /// * [`ConnectError::Start`] if the service's own start failed (also published as `ERROR`).
    pub async fn start_service(&self, id: &str) -> Result<()> {
        let service = match self.begin(id, ServiceStatus::needs_start, ServiceStatus::Starting)? {
            Step::Skip(status) => {
                info!("Lifecycle: '{}' already {}, start skipped", id, status);
                return Ok(());
            }
            Step::Run(service) => service,
        };

        info!("Lifecycle: Starting '{}'", id);
        match service.start().await {
            Ok(()) => {
                self.finish(id, &service, ServiceStatusEvent::new(id, ServiceStatus::Running));
                info!("Lifecycle: '{}' is running", id);
                Ok(())
            }
            Err(source) => {
                error!("Lifecycle: '{}' failed to start: {:#}", id, source);
                self.finish(id, &service, ServiceStatusEvent::failed(id, format!("{:#}", source)));
                Err(ConnectError::Start {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Stops one service. No-op when it is `STOPPED` or a start/stop is in flight.
    ///
    /// # Errors
    ///
    /// * [`ConnectError::NotFound`] if `id` is unknown.
    /// * [`ConnectError::Stop`] if the service's own stop failed (also published as `ERROR`).
    pub async fn stop_service(&self, id: &str) -> Result<()> {
        let service = match self.begin(id, ServiceStatus::needs_stop, ServiceStatus::Stopping)? {
            Step::Skip(status) => {
                info!("Lifecycle: '{}' is {}, stop skipped", id, status);
                return Ok(());
            }
            Step::Run(service) => service,
        };

        info!("Lifecycle: Stopping '{}'", id);
        match service.stop().await {
            Ok(()) => {
                self.finish(id, &service, ServiceStatusEvent::new(id, ServiceStatus::Stopped));
                info!("Lifecycle: '{}' stopped", id);
                Ok(())
            }
            Err(source) => {
                error!("Lifecycle: '{}' failed to stop: {:#}", id, source);
                self.finish(id, &service, ServiceStatusEvent::failed(id, format!("{:#}", source)));
                Err(ConnectError::Stop {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Stop followed by start. A stop failure is reported but start is still attempted.
    ///
    /// A start or stop already in flight is awaited first, so the restart always
    /// goes through `STOPPING`/`STOPPED` (when there is something to stop) and
    /// `STARTING`.
    pub async fn restart_service(&self, id: &str) -> Result<()> {
        self.settle(id).await?;
        if let Err(e) = self.stop_service(id).await {
            match e {
                ConnectError::NotFound(_) => return Err(e),
                other => warn!("Lifecycle: Restarting '{}' after stop failure: {}", id, other),
            }
        }
        self.start_service(id).await
    }

    // --- Batch ---

    /// Starts every service in registration order, one after the other.
    ///
    /// The next service is only started once the current one reached `RUNNING`
    /// or `ERROR`. A failing service does not stop the batch.
    pub async fn start_all_services(&self) -> BatchReport {
        let ids = self.registry.read().ordered_ids();
        info!("Lifecycle: Starting {} services", ids.len());
        let mut report = BatchReport::default();
        for id in ids {
            let outcome = self.start_service(&id).await;
            self.record(&mut report, id, outcome);
        }
        report
    }

    /// Stops every service, in registration order unless configured otherwise.
    pub async fn stop_all_services(&self) -> BatchReport {
        let mut ids = self.registry.read().ordered_ids();
        if self.stop_order == StopOrder::Reverse {
            ids.reverse();
        }
        info!("Lifecycle: Stopping {} services", ids.len());
        let mut report = BatchReport::default();
        for id in ids {
            let outcome = self.stop_service(&id).await;
            self.record(&mut report, id, outcome);
        }
        report
    }

    /// Stops everything, then starts everything.
    pub async fn restart_all_services(&self) -> RestartReport {
        let stopped = self.stop_all_services().await;
        let started = self.start_all_services().await;
        RestartReport { stopped, started }
    }

    // --- Helpers ---

    /// Checks the current status and, if `needed`, moves to `next` and publishes it.
    fn begin(
        &self,
        id: &str,
        needed: fn(&ServiceStatus) -> bool,
        next: ServiceStatus,
    ) -> Result<Step> {
        let mut registry = self.registry.write();
        let entry = registry.get(id)?;
        let current = entry.status();
        if !needed(&current) {
            return Ok(Step::Skip(current));
        }
        let service = entry.service().clone();
        registry.set_status(id, next)?;
        self.event_bus.publish(ServiceStatusEvent::new(id, next));
        Ok(Step::Run(service))
    }

    /// Waits until `id` is no longer `STARTING` or `STOPPING`.
    async fn settle(&self, id: &str) -> Result<()> {
        let status = self.registry.read().status(id)?;
        if !status.is_transient() {
            return Ok(());
        }
        info!("Lifecycle: '{}' is {}, waiting for it to settle", id, status);
        // The transient event is already cached, so the replay starts from it
        // (or from whatever came after it).
        let mut events = self.event_bus.subscribe_and_replay(id);
        while let Some(event) = events.recv().await {
            if !event.status().is_transient() {
                break;
            }
        }
        Ok(())
    }

    /// Applies the terminal status of an operation and publishes it.
    ///
    /// Dropped when `service` is no longer the registered instance for `id`
    /// (removed, or removed and registered again) while the operation ran.
    fn finish(&self, id: &str, service: &Arc<dyn Service>, event: ServiceStatusEvent) {
        let mut registry = self.registry.write();
        let current = matches!(registry.get(id), Ok(entry) if Arc::ptr_eq(entry.service(), service));
        if !current {
            warn!(
                "Lifecycle: '{}' was removed while {} was in flight, event dropped",
                id,
                event.status()
            );
            return;
        }
        if registry.set_status(id, event.status()).is_ok() {
            self.event_bus.publish(event);
        }
    }

    fn record(&self, report: &mut BatchReport, id: String, outcome: Result<()>) {
        match outcome {
            Err(ConnectError::NotFound(_)) => {
                warn!("Lifecycle: '{}' was removed during the batch, skipped", id);
            }
            Ok(()) => {
                let status = self.status(&id).unwrap_or(ServiceStatus::Stopped);
                report.push(id, status, None);
            }
            Err(e) => {
                let status = self.status(&id).unwrap_or(ServiceStatus::Error);
                report.push(id, status, Some(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use tokio::time::{sleep, Duration};

    // --- Mock Service ---
    struct MockService {
        id: &'static str,
        journal: Arc<Mutex<Vec<String>>>,
        fail_start: AtomicBool,
        fail_stop: AtomicBool,
        starts: AtomicUsize,
        delay: Duration,
    }

    impl MockService {
        fn new(id: &'static str, journal: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Self::slow(id, journal, 0)
        }

        fn slow(id: &'static str, journal: &Arc<Mutex<Vec<String>>>, millis: u64) -> Arc<Self> {
            Arc::new(Self {
                id,
                journal: journal.clone(),
                fail_start: AtomicBool::new(false),
                fail_stop: AtomicBool::new(false),
                starts: AtomicUsize::new(0),
                delay: Duration::from_millis(millis),
            })
        }
    }

    #[async_trait]
    impl Service for MockService {
        fn id(&self) -> &str {
            self.id
        }

        async fn start(&self) -> anyhow::Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            self.journal.lock().push(format!("{}:start:begin", self.id));
            sleep(self.delay).await;
            self.journal.lock().push(format!("{}:start:end", self.id));
            if self.fail_start.load(Ordering::SeqCst) {
                anyhow::bail!("{} exploded", self.id);
            }
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.journal.lock().push(format!("{}:stop", self.id));
            if self.fail_stop.load(Ordering::SeqCst) {
                anyhow::bail!("{} refused to stop", self.id);
            }
            Ok(())
        }
    }

    fn drain(sub: &mut crate::event_bus::Subscription) -> Vec<String> {
        let mut seen = Vec::new();
        while let Some(event) = sub.try_recv() {
            seen.push(format!("{}:{}", event.service_id(), event.status()));
        }
        seen
    }

    fn setup() -> (LifecycleController, Arc<Mutex<Vec<String>>>) {
        let _ = env_logger::builder().is_test(true).try_init();
        (
            LifecycleController::new(EventBus::new()),
            Arc::new(Mutex::new(Vec::new())),
        )
    }

    /// **Objective**: batch start walks the registration order and each service
    /// finishes before the next one begins, even when starts take time.
    #[tokio::test]
    async fn test_start_all_is_sequential_in_registration_order() {
        let (controller, journal) = setup();
        controller.add_service(MockService::slow("config", &journal, 30)).unwrap();
        controller.add_service(MockService::slow("data", &journal, 5)).unwrap();
        controller.add_service(MockService::new("auth", &journal)).unwrap();
        let mut events = controller.event_bus().subscribe_all();

        let report = controller.start_all_services().await;

        assert!(report.all_succeeded());
        assert_eq!(
            *journal.lock(),
            [
                "config:start:begin",
                "config:start:end",
                "data:start:begin",
                "data:start:end",
                "auth:start:begin",
                "auth:start:end",
            ]
        );
        assert_eq!(
            drain(&mut events),
            [
                "config:STARTING",
                "config:RUNNING",
                "data:STARTING",
                "data:RUNNING",
                "auth:STARTING",
                "auth:RUNNING",
            ]
        );
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let (controller, journal) = setup();
        let service = MockService::new("auth", &journal);
        controller.add_service(service.clone()).unwrap();

        controller.start_service("auth").await.unwrap();
        let mut events = controller.event_bus().subscribe_all();
        controller.start_service("auth").await.unwrap();

        assert_eq!(service.starts.load(Ordering::SeqCst), 1);
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_starts_invoke_service_once() {
        let (controller, journal) = setup();
        let service = MockService::slow("backend", &journal, 20);
        controller.add_service(service.clone()).unwrap();

        let (a, b) = tokio::join!(
            controller.start_service("backend"),
            controller.start_service("backend")
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(service.starts.load(Ordering::SeqCst), 1);
    }

    /// **Objective**: a failing start is published with its cause and does not
    /// block the following services.
    #[tokio::test]
    async fn test_failed_start_does_not_abort_batch() {
        let (controller, journal) = setup();
        let broken = MockService::new("sensor", &journal);
        broken.fail_start.store(true, Ordering::SeqCst);
        controller.add_service(broken).unwrap();
        controller.add_service(MockService::new("cache", &journal)).unwrap();
        let mut events = controller.event_bus().subscribe_all();

        let report = controller.start_all_services().await;

        let first = events.try_recv().unwrap();
        assert_eq!(first.status(), ServiceStatus::Starting);
        let failure = events.try_recv().unwrap();
        assert_eq!(failure.status(), ServiceStatus::Error);
        assert_eq!(failure.error(), Some("sensor exploded"));
        assert_eq!(drain(&mut events), ["cache:STARTING", "cache:RUNNING"]);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].id, "sensor");
        assert_eq!(failures[0].status, ServiceStatus::Error);
        assert_eq!(controller.status("cache").unwrap(), ServiceStatus::Running);
    }

    #[tokio::test]
    async fn test_single_start_failure_is_returned() {
        let (controller, journal) = setup();
        let broken = MockService::new("auth", &journal);
        broken.fail_start.store(true, Ordering::SeqCst);
        controller.add_service(broken.clone()).unwrap();

        let err = controller.start_service("auth").await.unwrap_err();
        assert!(matches!(err, ConnectError::Start { ref id, .. } if id == "auth"));
        assert_eq!(controller.status("auth").unwrap(), ServiceStatus::Error);

        // ERROR -> STARTING is a fresh attempt.
        broken.fail_start.store(false, Ordering::SeqCst);
        controller.start_service("auth").await.unwrap();
        assert_eq!(controller.status("auth").unwrap(), ServiceStatus::Running);
        assert_eq!(broken.starts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unknown_service_is_not_found() {
        let (controller, _) = setup();
        assert!(matches!(
            controller.start_service("ghost").await,
            Err(ConnectError::NotFound(_))
        ));
        assert!(matches!(
            controller.stop_service("ghost").await,
            Err(ConnectError::NotFound(_))
        ));
        assert!(matches!(
            controller.restart_service("ghost").await,
            Err(ConnectError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stop_all_uses_registration_order() {
        let (controller, journal) = setup();
        for id in ["config", "data", "auth"] {
            controller.add_service(MockService::new(id, &journal)).unwrap();
        }
        controller.start_all_services().await;
        journal.lock().clear();
        let mut events = controller.event_bus().subscribe_all();

        let report = controller.stop_all_services().await;

        assert!(report.all_succeeded());
        assert_eq!(*journal.lock(), ["config:stop", "data:stop", "auth:stop"]);
        assert_eq!(
            drain(&mut events),
            [
                "config:STOPPING",
                "config:STOPPED",
                "data:STOPPING",
                "data:STOPPED",
                "auth:STOPPING",
                "auth:STOPPED",
            ]
        );
    }

    #[tokio::test]
    async fn test_stop_all_skips_already_stopped_services() {
        let (controller, journal) = setup();
        for id in ["config", "data", "auth"] {
            controller.add_service(MockService::new(id, &journal)).unwrap();
        }
        controller.start_all_services().await;
        controller.stop_service("data").await.unwrap();
        journal.lock().clear();

        let report = controller.stop_all_services().await;

        assert_eq!(*journal.lock(), ["config:stop", "auth:stop"]);
        assert_eq!(report.outcomes().len(), 3);
        assert!(report
            .outcomes()
            .iter()
            .all(|o| o.status == ServiceStatus::Stopped));
    }

    #[tokio::test]
    async fn test_reverse_stop_order_is_opt_in() {
        let (controller, journal) = setup();
        let controller = controller.with_stop_order(StopOrder::Reverse);
        for id in ["config", "data", "auth"] {
            controller.add_service(MockService::new(id, &journal)).unwrap();
        }
        controller.start_all_services().await;
        journal.lock().clear();

        controller.stop_all_services().await;
        assert_eq!(*journal.lock(), ["auth:stop", "data:stop", "config:stop"]);
    }

    #[tokio::test]
    async fn test_stop_is_noop_when_stopped() {
        let (controller, journal) = setup();
        controller.add_service(MockService::new("cache", &journal)).unwrap();
        let mut events = controller.event_bus().subscribe_all();

        controller.stop_service("cache").await.unwrap();

        assert!(journal.lock().is_empty());
        assert!(drain(&mut events).is_empty());
    }

    #[tokio::test]
    async fn test_restart_publishes_full_sequence() {
        let (controller, journal) = setup();
        controller.add_service(MockService::new("data", &journal)).unwrap();
        controller.start_service("data").await.unwrap();
        let mut events = controller.event_bus().subscribe_all();

        controller.restart_service("data").await.unwrap();

        assert_eq!(
            drain(&mut events),
            ["data:STOPPING", "data:STOPPED", "data:STARTING", "data:RUNNING"]
        );
    }

    #[tokio::test]
    async fn test_restart_attempts_start_after_stop_failure() {
        let (controller, journal) = setup();
        let stubborn = MockService::new("backend", &journal);
        stubborn.fail_stop.store(true, Ordering::SeqCst);
        controller.add_service(stubborn.clone()).unwrap();
        controller.start_service("backend").await.unwrap();
        let mut events = controller.event_bus().subscribe_all();

        controller.restart_service("backend").await.unwrap();

        assert_eq!(
            drain(&mut events),
            [
                "backend:STOPPING",
                "backend:ERROR",
                "backend:STARTING",
                "backend:RUNNING"
            ]
        );
        assert_eq!(stubborn.starts.load(Ordering::SeqCst), 2);
    }

    /// **Objective**: restarting a service whose start is still running waits
    /// for that start, then goes through the whole stop/start sequence.
    #[tokio::test]
    async fn test_restart_while_starting_waits_then_restarts() {
        let (controller, journal) = setup();
        let data = MockService::slow("data", &journal, 40);
        controller.add_service(data.clone()).unwrap();
        let mut events = controller.event_bus().subscribe_all();

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_service("data").await })
        };
        sleep(Duration::from_millis(10)).await;
        assert_eq!(controller.status("data").unwrap(), ServiceStatus::Starting);

        controller.restart_service("data").await.unwrap();
        first.await.unwrap().unwrap();

        assert_eq!(
            drain(&mut events),
            [
                "data:STARTING",
                "data:RUNNING",
                "data:STOPPING",
                "data:STOPPED",
                "data:STARTING",
                "data:RUNNING"
            ]
        );
        assert_eq!(data.starts.load(Ordering::SeqCst), 2);
    }

    /// **Objective**: removing a running service stops it first and publishes
    /// the stop transitions before it disappears.
    #[tokio::test]
    async fn test_remove_running_service_stops_it_first() {
        let (controller, journal) = setup();
        controller.add_service(MockService::new("data", &journal)).unwrap();
        controller.start_service("data").await.unwrap();
        let mut events = controller.event_bus().subscribe_all();

        controller.remove_service("data").await.unwrap();

        assert_eq!(drain(&mut events), ["data:STOPPING", "data:STOPPED"]);
        assert!(matches!(controller.service("data"), Err(ConnectError::NotFound(_))));
        assert_eq!(controller.event_bus().last_status("data"), None);
    }

    /// **Objective**: a start still running when its service is removed leaves
    /// no trace, even once the same id is registered again.
    #[tokio::test]
    async fn test_remove_while_starting_leaves_no_stale_status() {
        let (controller, journal) = setup();
        controller.add_service(MockService::slow("data", &journal, 50)).unwrap();

        let start = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_service("data").await })
        };
        sleep(Duration::from_millis(10)).await;
        controller.remove_service("data").await.unwrap();
        controller.add_service(MockService::new("data", &journal)).unwrap();

        start.await.unwrap().unwrap();

        assert_eq!(controller.status("data").unwrap(), ServiceStatus::Stopped);
        assert_eq!(controller.event_bus().last_status("data"), None);
        let query = crate::query::ServiceRunningQuery::new(controller.event_bus().clone());
        let mut wait = query.wait_for_running("data");
        assert!(futures::FutureExt::now_or_never(wait.next()).is_none());
    }

    #[tokio::test]
    async fn test_removal_during_batch_is_skipped() {
        let (controller, journal) = setup();
        controller.add_service(MockService::slow("config", &journal, 30)).unwrap();
        controller.add_service(MockService::new("data", &journal)).unwrap();

        let batch = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.start_all_services().await })
        };
        sleep(Duration::from_millis(10)).await;
        controller.remove_service("data").await.unwrap();

        let report = batch.await.unwrap();
        let ids: Vec<_> = report.outcomes().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["config"]);
        assert!(!journal.lock().contains(&"data:start:begin".to_string()));
    }

    #[tokio::test]
    async fn test_restart_all_stops_everything_before_starting() {
        let (controller, journal) = setup();
        for id in ["config", "data"] {
            controller.add_service(MockService::new(id, &journal)).unwrap();
        }
        controller.start_all_services().await;
        journal.lock().clear();

        let report = controller.restart_all_services().await;

        assert!(report.stopped.all_succeeded() && report.started.all_succeeded());
        assert_eq!(
            *journal.lock(),
            [
                "config:stop",
                "data:stop",
                "config:start:begin",
                "config:start:end",
                "data:start:begin",
                "data:start:end",
            ]
        );
    }
}
