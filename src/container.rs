//! # Dependency Container
//!
//! Read-only resolver handed to a service while it is being configured.
//!
//! The container holds a non-owning reference to the registry core: the
//! registry owns services, and services must never own the registry, so the
//! back-edge is a [`Weak`]. It exposes lookup only — configuration-time
//! resolution is read-only by design, which keeps a service's configure hook
//! from triggering re-entrant registrations during startup.

use crate::identifier::ServiceIdentifier;
use crate::registry::service_registry::RegistryCore;
use crate::service::Service;
use std::sync::{Arc, Weak};

/// Narrow accessor that lets a service resolve sibling services by id.
#[derive(Clone)]
pub struct DependencyContainer {
    core: Weak<RegistryCore>,
}

impl DependencyContainer {
    pub(crate) fn new(core: Weak<RegistryCore>) -> Self {
        Self { core }
    }

    /// Look up a sibling service by id.
    ///
    /// Returns `None` if no service is registered under the id, or if the
    /// registry has already been dropped.
    pub async fn resolve(&self, id: &ServiceIdentifier) -> Option<Arc<dyn Service>> {
        let core = self.core.upgrade()?;
        let services = core.services.read().await;
        services.get(id).cloned()
    }
}

impl std::fmt::Debug for DependencyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyContainer")
            .field("registry_alive", &(self.core.strong_count() > 0))
            .finish()
    }
}
