use anyhow::{bail, Result};
use async_trait::async_trait;
use fieldhub::Service;
use log::info;
use parking_lot::Mutex;
use uuid::Uuid;

pub const AUTH_SERVICE_ID: &str = "auth";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Holds the user session. Starting requires credentials; the session token
/// lives until the service is stopped.
pub struct AuthService {
    credentials: Mutex<Option<Credentials>>,
    token: Mutex<Option<String>>,
}

impl AuthService {
    pub fn new() -> Self {
        Self {
            credentials: Mutex::new(None),
            token: Mutex::new(None),
        }
    }

    pub fn set_credentials(&self, credentials: Credentials) {
        *self.credentials.lock() = Some(credentials);
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().is_some()
    }
}

impl Default for AuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Service for AuthService {
    fn id(&self) -> &str {
        AUTH_SERVICE_ID
    }

    fn display_name(&self) -> &str {
        "Auth Service"
    }

    async fn start(&self) -> Result<()> {
        let Some(credentials) = self.credentials.lock().clone() else {
            bail!("no credentials provided");
        };
        if credentials.email.is_empty() || credentials.password.is_empty() {
            bail!("email and password are required");
        }
        info!("Auth: Session opened for {}", credentials.email);
        *self.token.lock() = Some(Uuid::new_v4().simple().to_string());
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}
