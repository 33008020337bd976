//! End-to-end registry scenarios: registration, replacement, removal,
//! teardown, and plugin notification ordering.

use async_trait::async_trait;
use lifecycle_registry::{
    DependencyContainer, EventKind, Plugin, RegistryError, RegistryEvent, Service, ServiceError,
    ServiceIdentifier, ServiceRegistry,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio_test::assert_ok;

/// Service whose lifecycle calls are observable and individually failable.
struct ProbeService {
    id: ServiceIdentifier,
    running: AtomicBool,
    stop_calls: AtomicU64,
    fail_stop: bool,
    /// Sibling id to resolve during configuration, with the resolution
    /// outcome recorded for assertions.
    configure_lookup: Option<ServiceIdentifier>,
    configure_lookup_hit: AtomicBool,
}

impl ProbeService {
    fn build(id: &str) -> Self {
        Self {
            id: ServiceIdentifier::new(id),
            running: AtomicBool::new(false),
            stop_calls: AtomicU64::new(0),
            fail_stop: false,
            configure_lookup: None,
            configure_lookup_hit: AtomicBool::new(false),
        }
    }

    fn new(id: &str) -> Arc<Self> {
        Arc::new(Self::build(id))
    }

    fn with_failing_stop(id: &str) -> Arc<Self> {
        Arc::new(Self {
            fail_stop: true,
            ..Self::build(id)
        })
    }

    fn resolving(id: &str, sibling: &str) -> Arc<Self> {
        Arc::new(Self {
            configure_lookup: Some(ServiceIdentifier::new(sibling)),
            ..Self::build(id)
        })
    }
}

#[async_trait]
impl Service for ProbeService {
    fn id(&self) -> ServiceIdentifier {
        self.id.clone()
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    async fn start(&self) -> Result<(), ServiceError> {
        self.running.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), ServiceError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err("refusing to stop".into());
        }
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn configure_async(&self, container: &DependencyContainer) -> Result<(), ServiceError> {
        if let Some(sibling) = &self.configure_lookup {
            let hit = container.resolve(sibling).await.is_some();
            self.configure_lookup_hit.store(hit, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// One observed notification, snapshotted at delivery time.
#[derive(Debug, Clone)]
struct SeenEvent {
    kind: EventKind,
    service_id: ServiceIdentifier,
    replaced_id: Option<ServiceIdentifier>,
    /// For `Registered` events: whether `find` on the delivered registry
    /// handle already returned the new service.
    visible_in_registry: Option<bool>,
}

struct RecordingPlugin {
    id: String,
    install_calls: AtomicU64,
    seen: Mutex<Vec<SeenEvent>>,
}

impl RecordingPlugin {
    fn new(id: &str) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            install_calls: AtomicU64::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<SeenEvent> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Plugin for RecordingPlugin {
    fn plugin_id(&self) -> &str {
        &self.id
    }

    async fn install(&self, _registry: &ServiceRegistry) {
        self.install_calls.fetch_add(1, Ordering::SeqCst);
    }

    async fn on_event(
        &self,
        registry: &ServiceRegistry,
        event: &RegistryEvent,
    ) -> Result<(), ServiceError> {
        let visible_in_registry = match event {
            RegistryEvent::Registered { service, .. } => {
                let found = registry.find(&service.id()).await;
                Some(found.is_some_and(|f| Arc::ptr_eq(&f, service)))
            }
            _ => None,
        };

        let replaced_id = match event {
            RegistryEvent::Registered { replaced, .. } => replaced.as_ref().map(|s| s.id()),
            _ => None,
        };

        self.seen.lock().unwrap().push(SeenEvent {
            kind: event.kind(),
            service_id: event.service().id(),
            replaced_id,
            visible_in_registry,
        });
        Ok(())
    }
}

#[tokio::test]
async fn register_replace_remove_scenario() {
    let registry = ServiceRegistry::new();
    let x = ServiceIdentifier::new("x");

    // Register A under "x".
    let a = ProbeService::new("x");
    let replaced = registry.register(a.clone() as Arc<dyn Service>).await.unwrap();
    assert!(replaced.is_none());
    let found = registry.find(&x).await.unwrap();
    assert!(Arc::ptr_eq(&found, &(a.clone() as Arc<dyn Service>)));

    // Register B under the same id: A comes back as previous.
    let b = ProbeService::new("x");
    let previous = registry
        .register(b.clone() as Arc<dyn Service>)
        .await
        .unwrap()
        .unwrap();
    assert!(Arc::ptr_eq(&previous, &(a as Arc<dyn Service>)));
    let found = registry.find(&x).await.unwrap();
    assert!(Arc::ptr_eq(&found, &(b.clone() as Arc<dyn Service>)));

    // Remove "x": B is returned and stopped; lookup now misses.
    let removed = registry.remove(&x).await.unwrap();
    assert!(Arc::ptr_eq(&removed, &(b.clone() as Arc<dyn Service>)));
    assert_eq!(b.stop_calls.load(Ordering::SeqCst), 1);
    assert!(registry.find(&x).await.is_none());
}

#[tokio::test]
async fn plugin_receives_exactly_one_registered_notification() {
    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;
    assert_eq!(plugin.install_calls.load(Ordering::SeqCst), 1);

    let c = ProbeService::new("y");
    registry.register(c as Arc<dyn Service>).await.unwrap();

    let seen = plugin.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].kind, EventKind::Registered);
    assert_eq!(seen[0].service_id, ServiceIdentifier::new("y"));
    assert_eq!(seen[0].replaced_id, None);
}

#[tokio::test]
async fn registered_notification_never_precedes_visibility() {
    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;

    registry
        .register(ProbeService::new("net") as Arc<dyn Service>)
        .await
        .unwrap();

    let seen = plugin.seen();
    assert_eq!(seen[0].visible_in_registry, Some(true));
}

#[tokio::test]
async fn replacement_notification_carries_both_instances() {
    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;

    registry
        .register(ProbeService::new("db") as Arc<dyn Service>)
        .await
        .unwrap();
    registry
        .register(ProbeService::new("db") as Arc<dyn Service>)
        .await
        .unwrap();

    let seen = plugin.seen();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[1].replaced_id, Some(ServiceIdentifier::new("db")));
}

#[tokio::test]
async fn start_missing_service_reports_not_found() {
    let registry = ServiceRegistry::new();
    let err = registry
        .start(&ServiceIdentifier::new("missing"))
        .await
        .unwrap_err();

    match err {
        RegistryError::ServiceNotFound { id } => assert_eq!(id, ServiceIdentifier::new("missing")),
        other => panic!("expected ServiceNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn remove_absent_id_triggers_no_notifications() {
    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;

    assert!(registry.remove(&ServiceIdentifier::new("ghost")).await.is_none());
    assert!(plugin.seen().is_empty());
}

#[tokio::test]
async fn duplicate_plugin_id_keeps_first_installation() {
    let first = RecordingPlugin::new("singleton");
    let second = RecordingPlugin::new("singleton");
    let registry = ServiceRegistry::new();

    registry.register_plugin(first.clone() as Arc<dyn Plugin>).await;
    registry.register_plugin(second.clone() as Arc<dyn Plugin>).await;

    assert_eq!(first.install_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.install_calls.load(Ordering::SeqCst), 0);
    assert_eq!(registry.installed_plugins().await, vec!["singleton".to_string()]);

    registry
        .register(ProbeService::new("svc") as Arc<dyn Service>)
        .await
        .unwrap();
    assert_eq!(first.seen().len(), 1);
    assert!(second.seen().is_empty());
}

#[tokio::test]
async fn stop_all_empties_registry_despite_stop_errors() {
    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;

    registry
        .register(ProbeService::new("good") as Arc<dyn Service>)
        .await
        .unwrap();
    registry
        .register(ProbeService::with_failing_stop("bad") as Arc<dyn Service>)
        .await
        .unwrap();

    registry.stop_all().await;
    assert!(registry.all_service_ids().await.is_empty());

    let seen = plugin.seen();
    let errored: Vec<_> = seen.iter().filter(|e| e.kind == EventKind::Errored).collect();
    let removed: Vec<_> = seen.iter().filter(|e| e.kind == EventKind::Removed).collect();
    assert_eq!(errored.len(), 1);
    assert_eq!(errored[0].service_id, ServiceIdentifier::new("bad"));
    assert_eq!(removed.len(), 2);
}

#[tokio::test]
async fn stop_error_during_removal_surfaces_as_error_notification() {
    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;

    registry
        .register(ProbeService::with_failing_stop("stubborn") as Arc<dyn Service>)
        .await
        .unwrap();
    assert!(registry.remove(&ServiceIdentifier::new("stubborn")).await.is_some());

    let kinds: Vec<_> = plugin.seen().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Registered, EventKind::Errored, EventKind::Removed]
    );
}

#[tokio::test]
async fn container_resolves_siblings_during_configuration() {
    let registry = ServiceRegistry::new();
    registry
        .register(ProbeService::new("storage") as Arc<dyn Service>)
        .await
        .unwrap();

    let dependent = ProbeService::resolving("indexer", "storage");
    registry
        .register(dependent.clone() as Arc<dyn Service>)
        .await
        .unwrap();

    assert!(dependent.configure_lookup_hit.load(Ordering::SeqCst));
}

#[tokio::test]
async fn start_stop_notifications_follow_lifecycle() {
    lifecycle_registry::logging::init_logging();

    let plugin = RecordingPlugin::new("observer");
    let registry = ServiceRegistry::with_plugins(vec![plugin.clone() as Arc<dyn Plugin>]).await;
    let id = ServiceIdentifier::new("pump");

    let service = ProbeService::new("pump");
    registry.register(service.clone() as Arc<dyn Service>).await.unwrap();

    tokio_test::assert_ok!(registry.start(&id).await);
    assert!(service.is_running());
    tokio_test::assert_ok!(registry.stop(&id).await);
    assert!(!service.is_running());

    let kinds: Vec<_> = plugin.seen().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Registered, EventKind::Started, EventKind::Stopped]
    );
}
