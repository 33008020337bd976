//! # Registry
//!
//! The service registry orchestrator and its plugin notification subsystem.
//!
//! ## Architecture
//!
//! ```text
//! ServiceRegistry                (service map + lifecycle protocol)
//! └── PluginManager              (plugin table + event fan-out)
//! ```
//!
//! The registry owns all service state and serializes every mutation; the
//! PluginManager is the sole component that invokes plugin callbacks, so
//! notification ordering is centralized in one place.

pub mod plugin_manager;
pub mod service_registry;

pub use plugin_manager::{PluginDetail, PluginManager, PluginManagerStats};
pub use service_registry::{RegistryStats, ServiceRegistry};
