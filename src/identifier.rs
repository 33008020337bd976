//! # Service Identifier
//!
//! String-backed value type used as the registry key.
//!
//! Two identifiers are interchangeable iff their underlying strings match;
//! equality and hashing are structural. Identifiers are typically minted once
//! as compile-time constants and cloned freely.
//!
//! ## Usage
//!
//! ```rust
//! use lifecycle_registry::ServiceIdentifier;
//!
//! const NETWORKING: ServiceIdentifier = ServiceIdentifier::from_static("networking");
//!
//! let dynamic = ServiceIdentifier::new(format!("worker-{}", 3));
//! assert_ne!(NETWORKING, dynamic);
//! assert_eq!(NETWORKING, ServiceIdentifier::new("networking"));
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Opaque key identifying a service in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceIdentifier(Cow<'static, str>);

impl ServiceIdentifier {
    /// Create an identifier from an owned or borrowed string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Cow::Owned(id.into()))
    }

    /// Create an identifier from a static string, usable in `const` contexts.
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// The underlying string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServiceIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ServiceIdentifier {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for ServiceIdentifier {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl AsRef<str> for ServiceIdentifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
