//! # Registry Events
//!
//! Tagged-variant description of a registry mutation, fanned out to plugins.
//!
//! One enum carries all five notification kinds so the fan-out surface stays
//! a single dispatch point instead of five structurally identical methods;
//! adding an event kind means adding a variant, not another fan-out loop.
//!
//! Events are delivered strictly after the mutation they describe is
//! externally visible: a plugin that calls `find` from its callback sees the
//! post-mutation map.

use crate::error::ServiceError;
use crate::service::Service;
use std::sync::Arc;

/// Discriminant for [`RegistryEvent`], handy for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Registered,
    Removed,
    Started,
    Stopped,
    Errored,
}

impl EventKind {
    /// Stable lowercase name, used as the tracing field value.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Registered => "registered",
            EventKind::Removed => "removed",
            EventKind::Started => "started",
            EventKind::Stopped => "stopped",
            EventKind::Errored => "errored",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single registry mutation, as reported to plugins.
pub enum RegistryEvent {
    /// A service was inserted into the map, possibly displacing a previous
    /// instance registered under the same id.
    Registered {
        service: Arc<dyn Service>,
        replaced: Option<Arc<dyn Service>>,
    },
    /// A service was removed from the map (its stop has already been
    /// attempted).
    Removed { service: Arc<dyn Service> },
    /// A service's `start` completed successfully.
    Started { service: Arc<dyn Service> },
    /// A service's `stop` completed successfully.
    Stopped { service: Arc<dyn Service> },
    /// A lifecycle call failed in a context where the registry captures the
    /// fault instead of propagating it (stop during removal or teardown).
    Errored {
        service: Arc<dyn Service>,
        error: ServiceError,
    },
}

impl RegistryEvent {
    /// The event's kind discriminant.
    pub fn kind(&self) -> EventKind {
        match self {
            RegistryEvent::Registered { .. } => EventKind::Registered,
            RegistryEvent::Removed { .. } => EventKind::Removed,
            RegistryEvent::Started { .. } => EventKind::Started,
            RegistryEvent::Stopped { .. } => EventKind::Stopped,
            RegistryEvent::Errored { .. } => EventKind::Errored,
        }
    }

    /// The service the event concerns.
    pub fn service(&self) -> &Arc<dyn Service> {
        match self {
            RegistryEvent::Registered { service, .. }
            | RegistryEvent::Removed { service }
            | RegistryEvent::Started { service }
            | RegistryEvent::Stopped { service }
            | RegistryEvent::Errored { service, .. } => service,
        }
    }
}

impl std::fmt::Debug for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("RegistryEvent");
        s.field("kind", &self.kind()).field("service", &self.service().id());
        if let RegistryEvent::Registered { replaced: Some(prev), .. } = self {
            s.field("replaced", &prev.id());
        }
        if let RegistryEvent::Errored { error, .. } = self {
            s.field("error", &error.to_string());
        }
        s.finish()
    }
}
