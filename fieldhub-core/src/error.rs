use fieldhub::ValidationError;
use thiserror::Error;

/// Global error type for the orchestrator.
#[derive(Error, Debug)]
pub enum ConnectError {
    /// An operation referenced a service id that is not registered.
    #[error("Service '{0}' not found")]
    NotFound(String),

    /// A service with the same id is already registered.
    #[error("Service '{0}' is already registered")]
    DuplicateService(String),

    /// The service's own start operation failed.
    #[error("Service '{id}' failed to start: {source:#}")]
    Start {
        id: String,
        source: anyhow::Error,
    },

    /// The service's own stop operation failed.
    #[error("Service '{id}' failed to stop: {source:#}")]
    Stop {
        id: String,
        source: anyhow::Error,
    },

    /// An observer waited on a service that ended up in `ERROR`.
    #[error("Service '{id}' is in error: {reason}")]
    ServiceFailed { id: String, reason: String },

    /// Malformed store configuration.
    #[error("Invalid store config: {0}")]
    Validation(#[from] ValidationError),

    /// Two store configs share the same `uniqueid`.
    #[error("Store '{0}' is already configured")]
    DuplicateStore(String),

    /// The event bus was dropped while an observer was still waiting.
    #[error("Event bus closed while waiting on '{0}'")]
    BusClosed(String),

    /// Reading or writing the persisted device identity failed.
    #[error("Device identity error: {0}")]
    Identity(#[from] std::io::Error),

    /// Failed to load the hub configuration.
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// A specialized Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, ConnectError>;
