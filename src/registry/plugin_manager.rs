//! # Plugin Manager
//!
//! Owns the set of installed plugins and fans registry events out to them.
//!
//! ## Overview
//!
//! The PluginManager is the sole component permitted to invoke plugin
//! callbacks, so all notification ordering lives in one place. Plugins are
//! kept in installation order and notified in that order; a plugin callback
//! returning an error is logged and never aborts delivery to the remaining
//! plugins.
//!
//! ## Key behaviors
//!
//! - **First registration wins**: a second plugin under an existing id is a
//!   silent no-op and its `install` hook is never invoked.
//! - **Fault isolation**: per-plugin callback failures are logged at error
//!   level and swallowed.
//! - **Delivery bookkeeping**: per-plugin `events_delivered` counter and
//!   `last_event_at` timestamp, exposed via [`PluginManager::stats`].

use crate::events::RegistryEvent;
use crate::plugin::Plugin;
use crate::registry::ServiceRegistry;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

struct PluginEntry {
    id: String,
    plugin: Arc<dyn Plugin>,
    installed_at: chrono::DateTime<chrono::Utc>,
    events_delivered: u64,
    last_event_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Manager for installed plugins; owned by the registry.
pub struct PluginManager {
    /// Installed plugins in installation order.
    entries: RwLock<Vec<PluginEntry>>,
}

impl PluginManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Install a plugin. If a plugin with the same id is already installed,
    /// the existing one is kept and the new plugin's `install` hook is never
    /// invoked.
    pub async fn register(&self, plugin: Arc<dyn Plugin>, registry: &ServiceRegistry) {
        let id = plugin.plugin_id().to_string();
        {
            let mut entries = self.entries.write().await;
            if entries.iter().any(|e| e.id == id) {
                debug!(plugin_id = %id, "Plugin already installed, ignoring duplicate");
                return;
            }
            entries.push(PluginEntry {
                id: id.clone(),
                plugin: plugin.clone(),
                installed_at: chrono::Utc::now(),
                events_delivered: 0,
                last_event_at: None,
            });
        }

        plugin.install(registry).await;
        info!(plugin_id = %id, "Installed plugin");
    }

    /// Uninstall a plugin by id. Absent ids are a silent no-op. Returns
    /// whether a plugin was actually removed.
    pub async fn unregister(&self, plugin_id: &str, registry: &ServiceRegistry) -> bool {
        let removed = {
            let mut entries = self.entries.write().await;
            match entries.iter().position(|e| e.id == plugin_id) {
                Some(index) => Some(entries.remove(index)),
                None => None,
            }
        };

        match removed {
            Some(entry) => {
                entry.plugin.uninstall(registry).await;
                info!(plugin_id = %plugin_id, "Uninstalled plugin");
                true
            }
            None => {
                debug!(plugin_id = %plugin_id, "Plugin not installed, nothing to remove");
                false
            }
        }
    }

    /// Deliver an event to every installed plugin, in installation order.
    /// Callback failures are logged and do not stop the fan-out.
    pub async fn notify(&self, registry: &ServiceRegistry, event: &RegistryEvent) {
        let targets: Vec<(String, Arc<dyn Plugin>)> = {
            let entries = self.entries.read().await;
            entries
                .iter()
                .map(|e| (e.id.clone(), e.plugin.clone()))
                .collect()
        };

        if targets.is_empty() {
            return;
        }

        let mut delivered = Vec::with_capacity(targets.len());
        for (plugin_id, plugin) in targets {
            if let Err(e) = plugin.on_event(registry, event).await {
                error!(
                    plugin_id = %plugin_id,
                    event = %event.kind(),
                    error = %e,
                    "Plugin callback failed"
                );
            }
            delivered.push(plugin_id);
        }

        let now = chrono::Utc::now();
        let mut entries = self.entries.write().await;
        for entry in entries.iter_mut() {
            if delivered.contains(&entry.id) {
                entry.events_delivered += 1;
                entry.last_event_at = Some(now);
            }
        }
    }

    /// Ids of installed plugins, in installation order.
    pub async fn plugin_ids(&self) -> Vec<String> {
        let entries = self.entries.read().await;
        entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Whether a plugin with the given id is installed.
    pub async fn contains(&self, plugin_id: &str) -> bool {
        let entries = self.entries.read().await;
        entries.iter().any(|e| e.id == plugin_id)
    }

    /// Snapshot of delivery statistics.
    pub async fn stats(&self) -> PluginManagerStats {
        let entries = self.entries.read().await;
        let mut stats = PluginManagerStats {
            total_plugins: entries.len(),
            total_events_delivered: 0,
            plugin_details: Vec::with_capacity(entries.len()),
        };

        for entry in entries.iter() {
            stats.total_events_delivered += entry.events_delivered;
            stats.plugin_details.push(PluginDetail {
                plugin_id: entry.id.clone(),
                installed_at: entry.installed_at,
                events_delivered: entry.events_delivered,
                last_event_at: entry.last_event_at,
            });
        }

        stats
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager").finish_non_exhaustive()
    }
}

/// Statistics about installed plugins and delivered events.
#[derive(Debug, Clone, Serialize)]
pub struct PluginManagerStats {
    pub total_plugins: usize,
    pub total_events_delivered: u64,
    pub plugin_details: Vec<PluginDetail>,
}

/// Delivery details for a single installed plugin.
#[derive(Debug, Clone, Serialize)]
pub struct PluginDetail {
    pub plugin_id: String,
    pub installed_at: chrono::DateTime<chrono::Utc>,
    pub events_delivered: u64,
    pub last_event_at: Option<chrono::DateTime<chrono::Utc>>,
}
