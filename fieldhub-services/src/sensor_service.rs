use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fieldhub::Service;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;

pub const SENSOR_SERVICE_ID: &str = "sensor";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy in meters.
    pub accuracy: f64,
    pub timestamp: DateTime<Utc>,
}

/// Relays location fixes from the platform while running.
pub struct SensorService {
    active: AtomicBool,
    fixes: watch::Sender<Option<LocationFix>>,
}

impl SensorService {
    pub fn new() -> Self {
        let (fixes, _) = watch::channel(None);
        Self {
            active: AtomicBool::new(false),
            fixes,
        }
    }

    /// Feeds a fix from the platform. Ignored (returns `false`) while stopped.
    pub fn record_fix(&self, latitude: f64, longitude: f64, accuracy: f64) -> bool {
        if !self.active.load(Ordering::SeqCst) {
            return false;
        }
        self.fixes.send_replace(Some(LocationFix {
            latitude,
            longitude,
            accuracy,
            timestamp: Utc::now(),
        }));
        true
    }

    pub fn last_fix(&self) -> Option<LocationFix> {
        *self.fixes.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<LocationFix>> {
        self.fixes.subscribe()
    }
}

impl Default for SensorService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Service for SensorService {
    fn id(&self) -> &str {
        SENSOR_SERVICE_ID
    }

    fn display_name(&self) -> &str {
        "Sensor Service"
    }

    async fn start(&self) -> Result<()> {
        self.active.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.active.store(false, Ordering::SeqCst);
        self.fixes.send_replace(None);
        Ok(())
    }
}
