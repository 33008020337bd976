//! # Logging Setup
//!
//! Console tracing initialization for binaries and tests embedding the
//! registry. Library code only emits `tracing` events; the subscriber is the
//! embedder's choice, and this helper is a convenience for hosts that do not
//! bring their own.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize a console tracing subscriber, honoring `RUST_LOG`.
///
/// Idempotent, and a no-op if the host already installed a global
/// subscriber.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("lifecycle_registry=info"));

        let subscriber = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true))
            .with(filter);

        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}
