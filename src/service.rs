//! # Service Capability
//!
//! The contract every registry-managed component implements.
//!
//! ## Overview
//!
//! A service is an independently lifecycle-managed component identified by a
//! stable [`ServiceIdentifier`]. The registry drives each instance through a
//! configure → register → start → stop → remove protocol; the trait below is
//! the integration boundary a component exposes to participate.
//!
//! ## Lifecycle contract
//!
//! - `start` and `stop` must be idempotent: invoking either while already in
//!   the target state is a no-op, not an error.
//! - `is_running` is advisory. The authoritative running state is "currently
//!   present in the registry map and a `start` succeeded without a matching
//!   `stop`"; the flag exists so external holders can query cheaply.
//! - A registered service may still be referenced by the caller that built
//!   it, so implementations handle their own internal synchronization.
//!
//! ## Usage
//!
//! ```rust
//! use async_trait::async_trait;
//! use lifecycle_registry::{Service, ServiceError, ServiceIdentifier};
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! struct Heartbeat {
//!     running: AtomicBool,
//! }
//!
//! #[async_trait]
//! impl Service for Heartbeat {
//!     fn id(&self) -> ServiceIdentifier {
//!         ServiceIdentifier::from_static("heartbeat")
//!     }
//!
//!     fn is_running(&self) -> bool {
//!         self.running.load(Ordering::SeqCst)
//!     }
//!
//!     async fn start(&self) -> Result<(), ServiceError> {
//!         self.running.store(true, Ordering::SeqCst);
//!         Ok(())
//!     }
//!
//!     async fn stop(&self) -> Result<(), ServiceError> {
//!         self.running.store(false, Ordering::SeqCst);
//!         Ok(())
//!     }
//! }
//! ```

use crate::container::DependencyContainer;
use crate::error::ServiceError;
use crate::identifier::ServiceIdentifier;
use async_trait::async_trait;
use std::sync::Arc;

/// Contract for a registry-managed component.
#[async_trait]
pub trait Service: Send + Sync {
    /// Stable identifier used as the registry key.
    fn id(&self) -> ServiceIdentifier;

    /// Advisory running-state query; safe to call from outside the registry.
    fn is_running(&self) -> bool;

    /// Start the service. Must be idempotent.
    async fn start(&self) -> Result<(), ServiceError>;

    /// Stop the service. Must be idempotent.
    async fn stop(&self) -> Result<(), ServiceError>;

    /// Synchronous configuration hook, run before the service becomes
    /// discoverable. Has no error channel; services that can fail to
    /// configure implement [`Service::configure_async`] instead.
    fn configure(&self, container: &DependencyContainer) {
        let _ = container;
    }

    /// Asynchronous configuration hook, run after [`Service::configure`] and
    /// still before the service becomes discoverable. An error aborts
    /// registration: the service is never inserted and no notification
    /// fires.
    async fn configure_async(&self, container: &DependencyContainer) -> Result<(), ServiceError> {
        let _ = container;
        Ok(())
    }
}

/// Factory seam for constructing services on demand.
///
/// Used by [`ServiceRegistry::register_with`](crate::ServiceRegistry::register_with).
/// The factory is invoked to learn the service's id; on an id collision with
/// `replace_existing` false, the fresh instance is dropped unconfigured, so
/// the cost avoided is configuration and notification, not construction.
pub trait ServiceFactory: Send + Sync {
    /// Build a fresh service instance.
    fn make_service(&self) -> Arc<dyn Service>;
}

impl<F> ServiceFactory for F
where
    F: Fn() -> Arc<dyn Service> + Send + Sync,
{
    fn make_service(&self) -> Arc<dyn Service> {
        self()
    }
}
