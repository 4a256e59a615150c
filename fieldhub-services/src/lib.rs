//! # FieldHub standard services
//!
//! The services a field-data application registers on its [`FieldHub`]:
//!
//! * [`ConfigService`]: loads stores and the remote backend from the app config.
//! * [`DataService`]: serves the configured stores.
//! * [`SensorService`]: relays location fixes.
//! * [`AuthService`]: holds the user session.
//! * [`CacheService`]: bounded key/value cache.
//! * [`BackendService`]: connection to the remote backend, started once one is known.
//!
//! [`StandardServices`] builds all of them and registers them in order.
//!
//! [`FieldHub`]: fieldhub_core::FieldHub

pub mod auth_service;
pub mod backend_service;
pub mod cache_service;
pub mod config_service;
pub mod data_service;
pub mod sensor_service;
pub mod standard;

pub use auth_service::{AuthService, Credentials, AUTH_SERVICE_ID};
pub use backend_service::{BackendService, BACKEND_SERVICE_ID};
pub use cache_service::{CacheService, CACHE_SERVICE_ID};
pub use config_service::{AppConfig, ConfigService, ConfigSource, SharedCatalog, CONFIG_SERVICE_ID};
pub use data_service::{DataService, DATA_SERVICE_ID};
pub use sensor_service::{LocationFix, SensorService, SENSOR_SERVICE_ID};
pub use standard::StandardServices;
