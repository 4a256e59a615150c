//! # FieldHub API
//!
//! The shared vocabulary between the orchestrator and the services it drives.
//!
//! ## Modules
//! - `model`: status values, status events, store and remote descriptions.
//! - `traits`: the [`Service`] contract every pluggable subsystem implements.

pub mod model;
pub mod traits;

pub use model::remote::RemoteConfig;
pub use model::status::{ServiceDescriptor, ServiceStatus, ServiceStatusEvent};
pub use model::store::{StoreConfig, ValidationError};
pub use traits::service::Service;

pub mod prelude {
    pub use crate::model::status::{ServiceStatus, ServiceStatusEvent};
    pub use crate::traits::service::Service;
    pub use async_trait::async_trait;
}
