//! # Registry Error Types
//!
//! Structured error handling for registry operations using thiserror.
//!
//! Errors that originate inside a service's own `start`/`stop`/
//! `configure_async` are opaque to the registry; they are carried as a boxed
//! [`ServiceError`] and chained via `#[source]` so callers can inspect or
//! downcast them.

use crate::identifier::ServiceIdentifier;
use thiserror::Error;

/// Opaque error produced by a service's own lifecycle methods.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("service '{id}' is not registered")]
    ServiceNotFound { id: ServiceIdentifier },

    #[error("service '{id}' failed asynchronous configuration")]
    ConfigurationFailed {
        id: ServiceIdentifier,
        #[source]
        source: ServiceError,
    },

    #[error("service '{id}' failed to start")]
    StartFailed {
        id: ServiceIdentifier,
        #[source]
        source: ServiceError,
    },

    #[error("service '{id}' failed to stop")]
    StopFailed {
        id: ServiceIdentifier,
        #[source]
        source: ServiceError,
    },
}

impl RegistryError {
    /// Create a not-found error for the given id.
    pub fn not_found(id: impl Into<ServiceIdentifier>) -> Self {
        Self::ServiceNotFound { id: id.into() }
    }

    /// The identifier the failed operation targeted.
    pub fn service_id(&self) -> &ServiceIdentifier {
        match self {
            Self::ServiceNotFound { id }
            | Self::ConfigurationFailed { id, .. }
            | Self::StartFailed { id, .. }
            | Self::StopFailed { id, .. } => id,
        }
    }
}

/// Convenience result alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
