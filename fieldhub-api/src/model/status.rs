use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle state of a service.
///
/// ```text
/// STOPPED --start--> STARTING --ok--> RUNNING --stop--> STOPPING --ok--> STOPPED
///                       |                                   |
///                       +--fail--> ERROR <-------fail-------+
///                                    |
///                                    +--start--> STARTING
///                                    +--stop---> STOPPING
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    #[default]
    Stopped,
    Starting,
    Running,
    Stopping,
    Error,
}

impl ServiceStatus {
    /// Whether a start request has to do anything from this state.
    pub fn needs_start(&self) -> bool {
        matches!(self, Self::Stopped | Self::Error)
    }

    /// Whether a stop request has to do anything from this state.
    ///
    /// `Error` is included so a half-started service can release what it acquired.
    pub fn needs_stop(&self) -> bool {
        matches!(self, Self::Running | Self::Error)
    }

    /// `Running` and `Error` end a start attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Running | Self::Error)
    }

    /// `Starting` and `Stopping` mean an operation is in flight.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Starting | Self::Stopping)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stopped => "STOPPED",
            Self::Starting => "STARTING",
            Self::Running => "RUNNING",
            Self::Stopping => "STOPPING",
            Self::Error => "ERROR",
        };
        f.pad(s)
    }
}

/// Public view of a registered service (detached from the service instance).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    id: String,
    display_name: String,
    status: ServiceStatus,
}

impl ServiceDescriptor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            status: ServiceStatus::Stopped,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ServiceStatus) {
        self.status = status;
    }
}

/// An immutable record of a service reaching a new status.
///
/// Events are cloned to every subscriber, so the failure cause is carried as
/// its rendered message rather than as the original error value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServiceStatusEvent {
    service_id: String,
    status: ServiceStatus,
    timestamp: DateTime<Utc>,
    error: Option<String>,
}

impl ServiceStatusEvent {
    /// Creates an event for a successful transition.
    pub fn new(service_id: impl Into<String>, status: ServiceStatus) -> Self {
        Self {
            service_id: service_id.into(),
            status,
            timestamp: Utc::now(),
            error: None,
        }
    }

    /// Creates an `ERROR` event carrying the failure cause.
    pub fn failed(service_id: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            service_id: service_id.into(),
            status: ServiceStatus::Error,
            timestamp: Utc::now(),
            error: Some(cause.to_string()),
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }
    pub fn status(&self) -> ServiceStatus {
        self.status
    }
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

impl fmt::Display for ServiceStatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service_id, self.status)?;
        if let Some(err) = &self.error {
            write!(f, " ({})", err)?;
        }
        Ok(())
    }
}
