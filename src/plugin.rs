//! # Plugin Capability
//!
//! Observer contract for components that watch registry mutations.
//!
//! ## Overview
//!
//! A plugin is installed into the registry (not itself a managed service)
//! and receives a callback for every registry mutation, after the mutation
//! is externally visible. Plugins are identified by a stable string id;
//! installing a second plugin under an existing id is a silent no-op and
//! the second plugin's `install` hook is never invoked.
//!
//! Plugin callbacks run inside the registry's serialized mutation protocol.
//! They may read the registry they are handed (`find`, `all_service_ids`);
//! they must not invoke registry mutations from within a callback.
//!
//! ## Usage
//!
//! ```rust
//! use async_trait::async_trait;
//! use lifecycle_registry::{Plugin, RegistryEvent, ServiceError, ServiceRegistry};
//!
//! struct AuditLog;
//!
//! #[async_trait]
//! impl Plugin for AuditLog {
//!     fn plugin_id(&self) -> &str {
//!         "audit_log"
//!     }
//!
//!     async fn on_event(
//!         &self,
//!         _registry: &ServiceRegistry,
//!         event: &RegistryEvent,
//!     ) -> Result<(), ServiceError> {
//!         println!("{} {}", event.kind(), event.service().id());
//!         Ok(())
//!     }
//! }
//! ```

use crate::error::ServiceError;
use crate::events::RegistryEvent;
use crate::registry::ServiceRegistry;
use async_trait::async_trait;

/// Observer notified of every registry mutation.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable identifier; duplicate installations under one id are ignored.
    fn plugin_id(&self) -> &str;

    /// Called once when the plugin is installed. The registry handle allows
    /// eager inspection of already-registered services.
    async fn install(&self, registry: &ServiceRegistry) {
        let _ = registry;
    }

    /// Called once when the plugin is uninstalled.
    async fn uninstall(&self, registry: &ServiceRegistry) {
        let _ = registry;
    }

    /// Called for every registry mutation, after it is externally visible.
    /// An `Err` is logged by the manager and does not abort delivery to the
    /// remaining plugins.
    async fn on_event(
        &self,
        registry: &ServiceRegistry,
        event: &RegistryEvent,
    ) -> Result<(), ServiceError> {
        let _ = (registry, event);
        Ok(())
    }
}
