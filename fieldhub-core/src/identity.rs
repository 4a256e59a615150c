//! Per-install device identifier.
//!
//! A random UUID generated on first use and kept in the data directory. It is
//! not derived from any hardware identifier.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File (inside the data directory) holding the install id.
pub const DEVICE_IDENTITY_FILE: &str = "device_identity.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredIdentity {
    install_id: String,
}

/// Stable identifier of this installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    install_id: String,
    path: Option<PathBuf>,
}

impl DeviceIdentity {
    /// Loads the identifier persisted in `data_dir`, creating it on first use.
    ///
    /// # Errors
    ///
    /// * IO error if the directory cannot be created or the file cannot be read/written.
    /// * Parse error (as `io::Error`) if the file exists but is corrupt.
    pub fn load_or_create(data_dir: &Path) -> io::Result<Self> {
        let path = data_dir.join(DEVICE_IDENTITY_FILE);
        if path.exists() {
            let file = fs::File::open(&path)?;
            let stored: StoredIdentity = serde_json::from_reader(io::BufReader::new(file))?;
            return Ok(Self {
                install_id: stored.install_id,
                path: Some(path),
            });
        }

        fs::create_dir_all(data_dir)?;
        let stored = StoredIdentity {
            install_id: Uuid::new_v4().to_string(),
        };
        fs::write(&path, serde_json::to_string(&stored)?)?;
        info!("Identity: Generated install id {} ({:?})", stored.install_id, path);
        Ok(Self {
            install_id: stored.install_id,
            path: Some(path),
        })
    }

    /// An identifier that only lives as long as the process.
    pub fn ephemeral() -> Self {
        Self {
            install_id: Uuid::new_v4().to_string(),
            path: None,
        }
    }

    pub fn install_id(&self) -> &str {
        &self.install_id
    }

    /// Where the identifier is persisted, `None` for an ephemeral one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
