//! Integration tests for lazy resolution.
//!
//! These tests cover the path of an id the registry does not know:
//! - external urls and backend ids resolved through the default strategies
//! - the FUTURE lifecycle (pending, resolved and re-registered, rejected)
//! - vector data loading and the label update it triggers
//! - change events delivered through a broadcast channel

use georesource::config::StaticEnvironment;
use georesource::error::LoaderError;
use georesource::model::{GeoResource, GeoResourceType, VectorData, VectorSourceType};
use georesource::observable::{Field, FieldValue};
use georesource::provider::{BackendBulkProvider, BackendClient, StaticBackendClient};
use georesource::registry::{
    BroadcastListener, GeoResourceChanged, GeoResourceRegistry, RegistryChange,
};
use georesource::strategy::{BackendIdStrategy, ExternalUrlStrategy};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::TryRecvError;

// =============================================================================
// Test Helpers
// =============================================================================

fn backend() -> Arc<dyn BackendClient> {
    Arc::new(StaticBackendClient::new(vec![
        json!({
            "id": "tpo",
            "label": "TopPlus",
            "type": "wmts",
            "url": "https://tiles/{z}/{x}/{y}.png",
            "background": true
        }),
        json!({
            "id": "atkis",
            "label": "Webkarte",
            "type": "wms",
            "url": "https://geoservices.example/wms",
            "layers": "by_webkarte",
            "format": "image/png",
            "attribution": [{"description": "z0"}, {"description": "z1"}]
        }),
        json!({
            "id": "broken",
            "label": "No url",
            "type": "wmts"
        }),
    ]))
}

fn registry_with(listener: Arc<BroadcastListener>) -> GeoResourceRegistry {
    let client = backend();
    GeoResourceRegistry::builder(Arc::new(BackendBulkProvider::new(client.clone())))
        .with_strategy(Arc::new(ExternalUrlStrategy::new()))
        .with_strategy(Arc::new(BackendIdStrategy::new(client)))
        .with_environment(Arc::new(StaticEnvironment::backend()))
        .with_listener(listener)
        .build()
}

// =============================================================================
// Backend catalog
// =============================================================================

#[tokio::test]
async fn test_backend_catalog_skips_invalid_definitions() {
    let registry = registry_with(Arc::new(BroadcastListener::default()));

    let entries = registry.init().await;

    let ids: Vec<_> = entries.iter().map(|e| e.id().to_string()).collect();
    assert_eq!(ids, vec!["tpo", "atkis"]);
    assert!(entries[0].snapshot().is_background());

    let attribution = entries[1].attribution(5).unwrap().unwrap();
    assert_eq!(attribution[0].description, "z1");
}

// =============================================================================
// FUTURE lifecycle
// =============================================================================

#[tokio::test]
async fn test_future_resolves_and_is_re_registered() {
    let listener = Arc::new(BroadcastListener::default());
    let mut events = listener.subscribe();
    let registry = registry_with(listener);
    registry.init().await;

    // NotRegistered -> PendingFuture
    let pending = registry.resolve_by_id("atkis").unwrap();
    assert_eq!(pending.kind(), GeoResourceType::Future);
    assert_eq!(registry.by_id("atkis").unwrap().kind(), GeoResourceType::Future);
    assert_eq!(registry.len(), 2);

    // PendingFuture -> Resolved; the registry never swaps on its own
    let resolved = pending.get().await.unwrap();
    assert_eq!(resolved.kind(), GeoResourceType::Wms);
    assert_eq!(registry.by_id("atkis").unwrap().kind(), GeoResourceType::Future);

    let concrete = registry.add_or_replace(resolved);
    assert_eq!(registry.by_id("atkis").unwrap().kind(), GeoResourceType::Wms);
    assert!(registry.by_id("atkis").unwrap().ptr_eq(&concrete));
    assert_eq!(concrete.label(), "Webkarte");

    let first = events.recv().await.unwrap();
    let second = events.recv().await.unwrap();
    assert_eq!(
        first.change,
        RegistryChange::Registered {
            kind: GeoResourceType::Future,
            replaced: true
        }
    );
    assert_eq!(
        second.change,
        RegistryChange::Registered {
            kind: GeoResourceType::Wms,
            replaced: true
        }
    );
}

#[tokio::test]
async fn test_future_rejection_leaves_cache_unchanged() {
    let registry = registry_with(Arc::new(BroadcastListener::default()));
    registry.init().await;

    let pending = registry.resolve_by_id("broken").unwrap();
    let rejected = Arc::new(AtomicUsize::new(0));
    let counter = rejected.clone();
    assert!(pending.on_reject(move |future| {
        assert_eq!(future.kind(), GeoResourceType::Future);
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let err = pending.get().await.unwrap_err();

    assert!(err.to_string().contains("broken"));
    assert_eq!(rejected.load(Ordering::SeqCst), 1);
    assert!(registry.by_id("broken").unwrap().ptr_eq(&pending));
}

#[tokio::test]
async fn test_future_callbacks_receive_result_and_future() {
    let registry = registry_with(Arc::new(BroadcastListener::default()));
    registry.init().await;
    let seen = Arc::new(Mutex::new(None));
    let sink = seen.clone();

    let pending = registry.resolve_by_id("tpo").unwrap();
    pending.on_resolve(move |result, future| {
        *sink.lock() = Some((result.kind(), future.kind(), future.id().to_string()));
    });
    pending.get().await.unwrap();

    assert_eq!(
        *seen.lock(),
        Some((GeoResourceType::Wmts, GeoResourceType::Future, "tpo".to_string()))
    );
}

#[tokio::test]
async fn test_future_get_runs_loader_every_time() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let future = GeoResource::future("x", move |id| {
        counter.fetch_add(1, Ordering::SeqCst);
        async move { GeoResource::wmts(id, "X", "https://t").map_err(LoaderError::from) }
    })
    .unwrap();

    for _ in 0..3 {
        assert_eq!(future.get().await.unwrap().id(), "x");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

// =============================================================================
// External urls and vector data
// =============================================================================

#[tokio::test]
async fn test_external_wms_id() {
    let registry = registry_with(Arc::new(BroadcastListener::default()));
    registry.init().await;

    let id = "https://wms.example/service||layer_a||Layer A";
    let layer = registry.resolve_by_id(id).unwrap();

    assert_eq!(layer.kind(), GeoResourceType::Wms);
    assert_eq!(layer.label(), "Layer A");
    assert!(registry.by_id(id).is_some());
}

#[tokio::test]
async fn test_vector_label_update_is_broadcast() {
    let listener = Arc::new(BroadcastListener::default());
    let registry = registry_with(listener.clone());
    registry.init().await;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let vector = GeoResource::vector("route", "", VectorSourceType::Kml)
        .unwrap()
        .with_label("route.kml");
    let handle = registry.add_or_replace(vector);
    let mut events = listener.subscribe();

    handle.update_payload(|payload| {
        if let georesource::model::GeoResourceKind::Vector(vector) = payload {
            vector.set_loader(move |_id| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(VectorData::new("<kml/>", 4326).with_label("Alpine route")) }
            });
        }
    });

    let data = handle.load_vector().await.unwrap().unwrap();
    handle.load_vector().await.unwrap();

    assert_eq!(data.data, "<kml/>");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.by_id("route").unwrap().label(), "Alpine route");

    let event = events.recv().await.unwrap();
    assert_eq!(
        event,
        GeoResourceChanged::field_changed(
            "route",
            Field::Label,
            FieldValue::Text("Alpine route".to_string())
        )
    );
    assert!(matches!(events.try_recv(), Err(TryRecvError::Empty)));
}
