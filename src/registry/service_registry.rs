//! # Service Registry
//!
//! Process-wide authority owning the live set of registered services.
//!
//! ## Overview
//!
//! The ServiceRegistry owns the map of service-id → service instance, drives
//! every instance through the configure → register → start → stop → remove
//! protocol, and delegates per-mutation notification fan-out to the
//! [`PluginManager`]. All mutations are serialized: the full protocol of one
//! operation (configuration hooks, map write, plugin fan-out) completes
//! before the next begins.
//!
//! ## Concurrency
//!
//! Two locks split the serialized-execution-context guarantee:
//!
//! - `op_lock` is held for the entire protocol of every mutation, so no two
//!   mutations ever interleave and a plugin callback always observes the
//!   mutation it is being told about.
//! - the service map sits behind its own `RwLock`, write-locked only for the
//!   brief insert/remove. `find` and [`DependencyContainer::resolve`] take
//!   the read lock only, so a configure hook or plugin callback can look up
//!   siblings mid-mutation without deadlocking, and lookups never wait on a
//!   suspended lifecycle call.
//!
//! Plugin callbacks and service hooks run inside the mutation protocol and
//! must not invoke registry mutations re-entrantly.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifecycle_registry::{ServiceIdentifier, ServiceRegistry};
//! # use std::sync::Arc;
//! # async fn example(cache: Arc<dyn lifecycle_registry::Service>) -> lifecycle_registry::RegistryResult<()> {
//! let registry = ServiceRegistry::new();
//!
//! let replaced = registry.register(cache).await?;
//! assert!(replaced.is_none());
//!
//! registry.start(&ServiceIdentifier::from_static("cache")).await?;
//! registry.stop_all().await;
//! # Ok(())
//! # }
//! ```

use crate::container::DependencyContainer;
use crate::error::{RegistryError, RegistryResult};
use crate::events::RegistryEvent;
use crate::identifier::ServiceIdentifier;
use crate::plugin::Plugin;
use crate::registry::plugin_manager::{PluginManager, PluginManagerStats};
use crate::service::{Service, ServiceFactory};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Shared registry state; the [`DependencyContainer`] holds a `Weak` edge to
/// this so services can resolve siblings without owning the registry.
pub(crate) struct RegistryCore {
    pub(crate) services: RwLock<HashMap<ServiceIdentifier, Arc<dyn Service>>>,
    plugin_manager: PluginManager,
    /// Serializes the full protocol of every mutation.
    op_lock: Mutex<()>,
}

/// Orchestrator owning the map of registered services.
///
/// Cheap to clone; clones share the same underlying registry.
#[derive(Clone)]
pub struct ServiceRegistry {
    core: Arc<RegistryCore>,
}

impl ServiceRegistry {
    /// Create an empty registry with no plugins installed.
    pub fn new() -> Self {
        Self {
            core: Arc::new(RegistryCore {
                services: RwLock::new(HashMap::new()),
                plugin_manager: PluginManager::new(),
                op_lock: Mutex::new(()),
            }),
        }
    }

    /// Create a registry and install the given plugins in list order, before
    /// any service registration is accepted.
    pub async fn with_plugins(plugins: Vec<Arc<dyn Plugin>>) -> Self {
        let registry = Self::new();
        for plugin in plugins {
            registry.core.plugin_manager.register(plugin, &registry).await;
        }
        registry
    }

    fn container(&self) -> DependencyContainer {
        DependencyContainer::new(Arc::downgrade(&self.core))
    }

    /// Register a service, running its configuration hooks before it becomes
    /// discoverable.
    ///
    /// Returns the service previously registered under the same id, if any.
    /// A `configure_async` error aborts the registration: the map is left
    /// untouched and no notification fires.
    pub async fn register(
        &self,
        service: Arc<dyn Service>,
    ) -> RegistryResult<Option<Arc<dyn Service>>> {
        let _guard = self.core.op_lock.lock().await;
        self.register_locked(service).await
    }

    /// Construct a service via `factory` and register it.
    ///
    /// With `replace_existing` false, an id collision keeps the existing
    /// instance: the fresh one is discarded unconfigured and no notification
    /// fires. Returns the live instance either way.
    pub async fn register_with(
        &self,
        factory: &dyn ServiceFactory,
        replace_existing: bool,
    ) -> RegistryResult<Arc<dyn Service>> {
        let _guard = self.core.op_lock.lock().await;

        let service = factory.make_service();
        let id = service.id();

        if !replace_existing {
            let existing = {
                let services = self.core.services.read().await;
                services.get(&id).cloned()
            };
            if let Some(existing) = existing {
                debug!(service_id = %id, "Service already registered, keeping existing instance");
                return Ok(existing);
            }
        }

        self.register_locked(service.clone()).await?;
        Ok(service)
    }

    /// Register a sequence of services in iteration order.
    ///
    /// Returns the replaced instances, preserving relative order. NOT
    /// atomic: a configuration failure partway through leaves the earlier
    /// registrations in place; reconcile via [`ServiceRegistry::all_service_ids`].
    pub async fn register_all(
        &self,
        services: impl IntoIterator<Item = Arc<dyn Service>>,
    ) -> RegistryResult<Vec<Arc<dyn Service>>> {
        let _guard = self.core.op_lock.lock().await;

        let mut replaced = Vec::new();
        for service in services {
            if let Some(previous) = self.register_locked(service).await? {
                replaced.push(previous);
            }
        }
        Ok(replaced)
    }

    async fn register_locked(
        &self,
        service: Arc<dyn Service>,
    ) -> RegistryResult<Option<Arc<dyn Service>>> {
        let id = service.id();
        let container = self.container();

        service.configure(&container);
        service
            .configure_async(&container)
            .await
            .map_err(|source| RegistryError::ConfigurationFailed {
                id: id.clone(),
                source,
            })?;

        let replaced = {
            let mut services = self.core.services.write().await;
            services.insert(id.clone(), service.clone())
        };

        info!(service_id = %id, replaced = replaced.is_some(), "Registered service");
        self.notify(RegistryEvent::Registered {
            service,
            replaced: replaced.clone(),
        })
        .await;

        Ok(replaced)
    }

    /// Remove a service by id, stopping it first.
    ///
    /// A stop error is captured and surfaced as an error notification; it
    /// never blocks removal from the map or the removal notification.
    /// Returns `None` (with no notifications) if the id is absent.
    pub async fn remove(&self, id: &ServiceIdentifier) -> Option<Arc<dyn Service>> {
        let _guard = self.core.op_lock.lock().await;
        self.remove_locked(id).await
    }

    /// Remove a sequence of ids in iteration order, skipping absent ids.
    pub async fn remove_all(
        &self,
        ids: impl IntoIterator<Item = ServiceIdentifier>,
    ) -> Vec<Arc<dyn Service>> {
        let _guard = self.core.op_lock.lock().await;

        let mut removed = Vec::new();
        for id in ids {
            if let Some(service) = self.remove_locked(&id).await {
                removed.push(service);
            }
        }
        removed
    }

    async fn remove_locked(&self, id: &ServiceIdentifier) -> Option<Arc<dyn Service>> {
        let service = {
            let services = self.core.services.read().await;
            services.get(id).cloned()
        }?;

        // Teardown is unconditional: the stop outcome cannot keep the
        // service in the map.
        let stop_error = service.stop().await.err();

        {
            let mut services = self.core.services.write().await;
            services.remove(id);
        }
        info!(service_id = %id, "Removed service");

        if let Some(error) = stop_error {
            warn!(service_id = %id, error = %error, "Service failed to stop during removal");
            self.notify(RegistryEvent::Errored {
                service: service.clone(),
                error,
            })
            .await;
        }
        self.notify(RegistryEvent::Removed {
            service: service.clone(),
        })
        .await;

        Some(service)
    }

    /// Look up a service by id. Pure read; never waits on an in-flight
    /// lifecycle call.
    pub async fn find(&self, id: &ServiceIdentifier) -> Option<Arc<dyn Service>> {
        let services = self.core.services.read().await;
        services.get(id).cloned()
    }

    /// Snapshot of the currently registered ids.
    pub async fn all_service_ids(&self) -> Vec<ServiceIdentifier> {
        let services = self.core.services.read().await;
        services.keys().cloned().collect()
    }

    /// Start the service registered under `id`.
    ///
    /// Fails with [`RegistryError::ServiceNotFound`] if the id is absent;
    /// a service start error propagates to the caller as
    /// [`RegistryError::StartFailed`].
    pub async fn start(&self, id: &ServiceIdentifier) -> RegistryResult<()> {
        let _guard = self.core.op_lock.lock().await;

        let service = self.lookup_locked(id).await?;
        service
            .start()
            .await
            .map_err(|source| RegistryError::StartFailed {
                id: id.clone(),
                source,
            })?;

        info!(service_id = %id, "Started service");
        self.notify(RegistryEvent::Started { service }).await;
        Ok(())
    }

    /// Stop the service registered under `id`.
    ///
    /// Fails with [`RegistryError::ServiceNotFound`] if the id is absent;
    /// a service stop error propagates to the caller as
    /// [`RegistryError::StopFailed`], unlike [`ServiceRegistry::remove`]
    /// which captures it.
    pub async fn stop(&self, id: &ServiceIdentifier) -> RegistryResult<()> {
        let _guard = self.core.op_lock.lock().await;

        let service = self.lookup_locked(id).await?;
        service
            .stop()
            .await
            .map_err(|source| RegistryError::StopFailed {
                id: id.clone(),
                source,
            })?;

        info!(service_id = %id, "Stopped service");
        self.notify(RegistryEvent::Stopped { service }).await;
        Ok(())
    }

    /// Stop every registered service best-effort and clear the map.
    ///
    /// Each stop failure becomes an error notification and never aborts the
    /// loop; every cleared service is then reported as removed. Used for
    /// total teardown.
    pub async fn stop_all(&self) {
        let _guard = self.core.op_lock.lock().await;

        let services: Vec<Arc<dyn Service>> = {
            let services = self.core.services.read().await;
            services.values().cloned().collect()
        };

        for service in &services {
            if let Err(error) = service.stop().await {
                warn!(service_id = %service.id(), error = %error, "Service failed to stop during teardown");
                self.notify(RegistryEvent::Errored {
                    service: service.clone(),
                    error,
                })
                .await;
            }
        }

        {
            let mut map = self.core.services.write().await;
            map.clear();
        }
        info!(count = services.len(), "Registry cleared");

        for service in services {
            self.notify(RegistryEvent::Removed { service }).await;
        }
    }

    /// Install a plugin. Duplicate plugin ids are a silent no-op; the first
    /// registration wins.
    pub async fn register_plugin(&self, plugin: Arc<dyn Plugin>) {
        let _guard = self.core.op_lock.lock().await;
        self.core.plugin_manager.register(plugin, self).await;
    }

    /// Uninstall a plugin by id. Returns whether a plugin was removed.
    pub async fn remove_plugin(&self, plugin_id: &str) -> bool {
        let _guard = self.core.op_lock.lock().await;
        self.core.plugin_manager.unregister(plugin_id, self).await
    }

    /// Ids of installed plugins, in installation order.
    pub async fn installed_plugins(&self) -> Vec<String> {
        self.core.plugin_manager.plugin_ids().await
    }

    /// Snapshot of registry statistics.
    pub async fn stats(&self) -> RegistryStats {
        let services = self.core.services.read().await;
        let running_services = services.values().filter(|s| s.is_running()).count();
        RegistryStats {
            total_services: services.len(),
            running_services,
        }
    }

    /// Snapshot of plugin delivery statistics.
    pub async fn plugin_stats(&self) -> PluginManagerStats {
        self.core.plugin_manager.stats().await
    }

    async fn lookup_locked(&self, id: &ServiceIdentifier) -> RegistryResult<Arc<dyn Service>> {
        let services = self.core.services.read().await;
        services
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::ServiceNotFound { id: id.clone() })
    }

    async fn notify(&self, event: RegistryEvent) {
        self.core.plugin_manager.notify(self, &event).await;
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry").finish_non_exhaustive()
    }
}

/// Statistics about the registered service set.
#[derive(Debug, Clone, Serialize)]
pub struct RegistryStats {
    pub total_services: usize,
    pub running_services: usize,
}
