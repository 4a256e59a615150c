//! # FieldHub Core
//!
//! Orchestration of the pluggable services of a field data application.
//!
//! ## Modules
//! - `registry`: ordered set of registered services and their status.
//! - `event_bus`: multicast status events with last-status replay.
//! - `lifecycle`: start/stop/restart of one or all services.
//! - `query`: wait for a service to be running.
//! - `hub`: the [`FieldHub`] facade tying everything together.
//! - `discovery`, `identity`, `stores`, `config`: collaborators of the hub.

pub mod config;
pub mod discovery;
pub mod error;
pub mod event_bus;
pub mod hub;
pub mod identity;
pub mod lifecycle;
pub mod query;
pub mod registry;
pub mod stores;

pub use config::HubConfig;
pub use discovery::RemoteDiscovery;
pub use error::{ConnectError, Result};
pub use event_bus::{EventBus, Subscription};
pub use hub::FieldHub;
pub use lifecycle::{BatchReport, LifecycleController, RestartReport, ServiceOutcome, StopOrder};
pub use query::{RunningWait, ServiceRunningQuery};
pub use stores::StoreCatalog;
