//! In-memory registry of the services the orchestrator drives.
//!
//! It is PURE data. It does not start or stop anything; the
//! [`LifecycleController`](crate::lifecycle::LifecycleController) owns it behind a
//! lock and is the only component allowed to change a service status.
use crate::error::{ConnectError, Result};
use fieldhub::{Service, ServiceDescriptor, ServiceStatus};
use std::collections::HashMap;
use std::sync::Arc;

/// A registered service together with its tracked descriptor.
#[derive(Clone)]
pub struct RegisteredService {
    descriptor: ServiceDescriptor,
    service: Arc<dyn Service>,
}

impl RegisteredService {
    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn service(&self) -> &Arc<dyn Service> {
        &self.service
    }

    pub fn status(&self) -> ServiceStatus {
        self.descriptor.status()
    }
}

/// Ordered collection of services keyed by id.
///
/// Insertion order is significant: it is both the start and the stop order.
#[derive(Default)]
pub struct ServiceRegistry {
    /// Registration order.
    order: Vec<String>,
    /// Maps service id -> entry.
    services: HashMap<String, RegisteredService>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a service at the end of the order. New services start `STOPPED`.
    ///
    /// # Errors
    ///
    /// * [`ConnectError::DuplicateService`] if the id is already registered.
    pub fn add(&mut self, service: Arc<dyn Service>) -> Result<()> {
        let id = service.id().to_string();
        if self.services.contains_key(&id) {
            return Err(ConnectError::DuplicateService(id));
        }
        let descriptor = ServiceDescriptor::new(id.clone(), service.display_name());
        self.order.push(id.clone());
        self.services
            .insert(id, RegisteredService { descriptor, service });
        Ok(())
    }

    /// Removes a service from both the order and the index.
    pub fn remove(&mut self, id: &str) -> Result<RegisteredService> {
        let entry = self
            .services
            .remove(id)
            .ok_or_else(|| ConnectError::NotFound(id.to_string()))?;
        self.order.retain(|known| known != id);
        Ok(entry)
    }

    pub fn get(&self, id: &str) -> Result<&RegisteredService> {
        self.services
            .get(id)
            .ok_or_else(|| ConnectError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    pub fn status(&self, id: &str) -> Result<ServiceStatus> {
        self.get(id).map(RegisteredService::status)
    }

    pub fn set_status(&mut self, id: &str, status: ServiceStatus) -> Result<()> {
        let entry = self
            .services
            .get_mut(id)
            .ok_or_else(|| ConnectError::NotFound(id.to_string()))?;
        entry.descriptor.set_status(status);
        Ok(())
    }

    /// Snapshot of the registration order.
    pub fn ordered_ids(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Descriptors in registration order (cloned).
    /// Useful for status listings.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        self.order
            .iter()
            .filter_map(|id| self.services.get(id))
            .map(|entry| entry.descriptor.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.services.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl Service for Named {
        fn id(&self) -> &str {
            self.0
        }
        async fn start(&self) -> anyhow::Result<()> {
            Ok(())
        }
        async fn stop(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn registry_of(ids: &[&'static str]) -> ServiceRegistry {
        let mut registry = ServiceRegistry::new();
        for id in ids {
            registry.add(Arc::new(Named(id))).unwrap();
        }
        registry
    }

    #[test]
    fn test_preserves_registration_order() {
        let registry = registry_of(&["data", "sensor", "config", "auth"]);
        assert_eq!(registry.ordered_ids(), ["data", "sensor", "config", "auth"]);
        assert_eq!(registry.status("config").unwrap(), ServiceStatus::Stopped);
    }

    #[test]
    fn test_rejects_duplicate_id() {
        let mut registry = registry_of(&["data"]);
        let err = registry.add(Arc::new(Named("data"))).unwrap_err();
        assert!(matches!(err, ConnectError::DuplicateService(id) if id == "data"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_clears_order_and_index() {
        let mut registry = registry_of(&["data", "sensor", "config"]);
        registry.remove("sensor").unwrap();
        assert_eq!(registry.ordered_ids(), ["data", "config"]);
        assert!(matches!(registry.get("sensor"), Err(ConnectError::NotFound(_))));
        assert!(matches!(registry.remove("sensor"), Err(ConnectError::NotFound(_))));

        // The id can be registered again, at the end of the order.
        registry.add(Arc::new(Named("sensor"))).unwrap();
        assert_eq!(registry.ordered_ids(), ["data", "config", "sensor"]);
    }

    #[test]
    fn test_set_status_updates_descriptor() {
        let mut registry = registry_of(&["auth"]);
        registry.set_status("auth", ServiceStatus::Running).unwrap();
        assert_eq!(registry.descriptors()[0].status(), ServiceStatus::Running);
        assert!(registry.set_status("ghost", ServiceStatus::Running).is_err());
    }

    #[test]
    fn test_clear_empties_registry() {
        let mut registry = registry_of(&["data", "sensor"]);
        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.ordered_ids().is_empty());
    }
}
