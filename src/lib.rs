#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Lifecycle Registry
//!
//! Actor-style service registry and lifecycle orchestrator: a process-wide
//! authority that tracks independently-implemented service components,
//! manages their startup/shutdown ordering, mediates dependency lookup
//! between them, and notifies installed observer plugins of every registry
//! mutation.
//!
//! ## Architecture
//!
//! ```text
//! ServiceRegistry
//! ├── HashMap<ServiceIdentifier, Arc<dyn Service>>   (the one authority)
//! ├── DependencyContainer                            (weak, read-only resolver)
//! └── PluginManager
//!     └── Vec<Arc<dyn Plugin>>                       (install-order fan-out)
//! ```
//!
//! Every mutation runs a serialized protocol: configuration hooks → map
//! write → plugin fan-out. A service is never discoverable before its
//! configuration completes, and a plugin never observes a mutation before it
//! happened.
//!
//! ## Module Organization
//!
//! - [`identifier`] - String-backed registry key
//! - [`service`] - Service and factory capability traits
//! - [`container`] - Read-only sibling resolver handed out at configure time
//! - [`plugin`] - Observer capability trait
//! - [`events`] - Tagged-variant mutation notifications
//! - [`registry`] - The orchestrator and plugin manager
//! - [`error`] - Structured error taxonomy
//! - [`logging`] - Optional tracing setup for embedders
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lifecycle_registry::{ServiceIdentifier, ServiceRegistry};
//! use std::sync::Arc;
//!
//! # async fn example(
//! #     cache: Arc<dyn lifecycle_registry::Service>,
//! #     audit: Arc<dyn lifecycle_registry::Plugin>,
//! # ) -> lifecycle_registry::RegistryResult<()> {
//! const CACHE: ServiceIdentifier = ServiceIdentifier::from_static("cache");
//!
//! let registry = ServiceRegistry::with_plugins(vec![audit]).await;
//! let replaced = registry.register(cache).await?;
//! assert!(replaced.is_none());
//! registry.start(&CACHE).await?;
//!
//! // ... process lifetime ...
//!
//! registry.stop_all().await;
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod error;
pub mod events;
pub mod identifier;
pub mod logging;
pub mod plugin;
pub mod registry;
pub mod service;

pub use container::DependencyContainer;
pub use error::{RegistryError, RegistryResult, ServiceError};
pub use events::{EventKind, RegistryEvent};
pub use identifier::ServiceIdentifier;
pub use plugin::Plugin;
pub use registry::{
    PluginDetail, PluginManager, PluginManagerStats, RegistryStats, ServiceRegistry,
};
pub use service::{Service, ServiceFactory};
