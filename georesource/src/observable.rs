//! Observable GeoResource handles.
//!
//! [`ObservableGeoResource`] is a shared handle to one GeoResource plus a
//! change callback. Every mutator on the handle applies the change and then
//! calls `on_change(field, new_value)` exactly once. The callback runs after
//! the entity lock is released, so it may read the handle.
//!
//! Handles are identity-stable: clones point at the same entity, and
//! [`wrap`] called with a handle returns that handle instead of nesting a
//! second wrapper.
//!
//! ```
//! use georesource::model::GeoResource;
//! use georesource::observable::{wrap, Field, FieldValue};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! let changes = Arc::new(AtomicUsize::new(0));
//! let counter = changes.clone();
//! let handle = wrap(
//!     GeoResource::wmts("tpo", "TopPlus", "https://tiles/{z}/{x}/{y}").unwrap(),
//!     Arc::new(move |_field: Field, _value: &FieldValue| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }),
//! );
//!
//! let again = wrap(handle.clone(), Arc::new(|_: Field, _: &FieldValue| {}));
//! again.set_label("TopPlus Farbe");
//!
//! assert!(again.ptr_eq(&handle));
//! assert_eq!(handle.label(), "TopPlus Farbe");
//! assert_eq!(changes.load(Ordering::SeqCst), 1);
//! ```

use crate::error::{GeoResourceError, LoaderError};
use crate::model::{
    Attribution, AttributionResolver, AttributionSource, GeoResource, GeoResourceKind,
    GeoResourceType, VectorData,
};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Field of a GeoResource that a handle mutator touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Label,
    Background,
    Opacity,
    MinZoom,
    MaxZoom,
    Hidden,
    Attribution,
    AttributionResolver,
    Queryable,
    Exportable,
    AuthRoles,
    /// The kind-specific payload.
    Payload,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Background => "background",
            Self::Opacity => "opacity",
            Self::MinZoom => "min_zoom",
            Self::MaxZoom => "max_zoom",
            Self::Hidden => "hidden",
            Self::Attribution => "attribution",
            Self::AttributionResolver => "attribution_resolver",
            Self::Queryable => "queryable",
            Self::Exportable => "exportable",
            Self::AuthRoles => "auth_roles",
            Self::Payload => "payload",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// New value of a changed field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Number(f64),
    Zoom(Option<u8>),
    Attribution(Option<AttributionSource>),
    Roles(Vec<String>),
    /// Presence of a resolver; closures have no comparable value.
    Resolver(bool),
    /// Kind of the payload after the change.
    Kind(GeoResourceType),
}

/// Callback invoked after each mutation through a handle.
pub type ChangeCallback = Arc<dyn Fn(Field, &FieldValue) + Send + Sync>;

struct Inner {
    id: String,
    resource: RwLock<GeoResource>,
    on_change: ChangeCallback,
}

/// Shared, observable handle to a GeoResource.
#[derive(Clone)]
pub struct ObservableGeoResource {
    inner: Arc<Inner>,
}

/// Things that can be turned into an observable handle.
///
/// Implemented for raw resources (creates a new handle) and for handles
/// themselves (returned unchanged, keeping their original callback).
pub trait Observe {
    /// Id of the resource that will be observed.
    fn resource_id(&self) -> &str;

    fn observe(self, on_change: ChangeCallback) -> ObservableGeoResource;
}

impl Observe for GeoResource {
    fn resource_id(&self) -> &str {
        self.id()
    }

    fn observe(self, on_change: ChangeCallback) -> ObservableGeoResource {
        ObservableGeoResource {
            inner: Arc::new(Inner {
                id: self.id().to_string(),
                resource: RwLock::new(self),
                on_change,
            }),
        }
    }
}

impl Observe for ObservableGeoResource {
    fn resource_id(&self) -> &str {
        self.id()
    }

    fn observe(self, _on_change: ChangeCallback) -> ObservableGeoResource {
        self
    }
}

/// Wrap `target` so that mutations report to `on_change`.
pub fn wrap(target: impl Observe, on_change: ChangeCallback) -> ObservableGeoResource {
    target.observe(on_change)
}

impl ObservableGeoResource {
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> GeoResourceType {
        self.inner.resource.read().kind()
    }

    pub fn label(&self) -> String {
        self.inner.resource.read().label().to_string()
    }

    pub fn is_future(&self) -> bool {
        self.inner.resource.read().is_future()
    }

    /// Returns true if both handles refer to the same entity.
    pub fn ptr_eq(&self, other: &ObservableGeoResource) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Owned copy of the current state. Mutating the copy is not observed.
    pub fn snapshot(&self) -> GeoResource {
        self.inner.resource.read().clone()
    }

    /// Read the entity under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&GeoResource) -> R) -> R {
        let resource = self.inner.resource.read();
        f(&*resource)
    }

    pub fn attribution(&self, level: u8) -> Result<Option<Vec<Attribution>>, GeoResourceError> {
        self.inner.resource.read().attribution(level)
    }

    fn mutate(&self, field: Field, value: FieldValue, apply: impl FnOnce(&mut GeoResource)) {
        {
            let mut resource = self.inner.resource.write();
            apply(&mut *resource);
        }
        (self.inner.on_change)(field, &value);
    }

    pub fn set_label(&self, label: impl Into<String>) {
        let label = label.into();
        let value = FieldValue::Text(label.clone());
        self.mutate(Field::Label, value, |r| r.set_label(label));
    }

    pub fn set_background(&self, background: bool) {
        self.mutate(Field::Background, FieldValue::Bool(background), |r| {
            r.set_background(background)
        });
    }

    /// Set the opacity; the callback receives the clamped value.
    pub fn set_opacity(&self, opacity: f64) {
        let applied = {
            let mut resource = self.inner.resource.write();
            resource.set_opacity(opacity);
            resource.opacity()
        };
        (self.inner.on_change)(Field::Opacity, &FieldValue::Number(applied));
    }

    pub fn set_min_zoom(&self, zoom: Option<u8>) {
        self.mutate(Field::MinZoom, FieldValue::Zoom(zoom), |r| r.set_min_zoom(zoom));
    }

    pub fn set_max_zoom(&self, zoom: Option<u8>) {
        self.mutate(Field::MaxZoom, FieldValue::Zoom(zoom), |r| r.set_max_zoom(zoom));
    }

    pub fn set_hidden(&self, hidden: bool) {
        self.mutate(Field::Hidden, FieldValue::Bool(hidden), |r| r.set_hidden(hidden));
    }

    pub fn set_attribution(&self, attribution: Option<AttributionSource>) {
        let value = FieldValue::Attribution(attribution.clone());
        self.mutate(Field::Attribution, value, |r| r.set_attribution(attribution));
    }

    pub fn set_attribution_resolver(&self, resolver: Option<AttributionResolver>) {
        let value = FieldValue::Resolver(resolver.is_some());
        self.mutate(Field::AttributionResolver, value, |r| {
            r.set_attribution_resolver(resolver)
        });
    }

    pub fn set_queryable(&self, queryable: bool) {
        self.mutate(Field::Queryable, FieldValue::Bool(queryable), |r| {
            r.set_queryable(queryable)
        });
    }

    pub fn set_exportable(&self, exportable: bool) {
        self.mutate(Field::Exportable, FieldValue::Bool(exportable), |r| {
            r.set_exportable(exportable)
        });
    }

    pub fn set_auth_roles(&self, roles: Vec<String>) {
        let value = FieldValue::Roles(roles.clone());
        self.mutate(Field::AuthRoles, value, |r| r.set_auth_roles(roles));
    }

    /// Edit the kind-specific payload in place.
    ///
    /// Reports [`Field::Payload`] with the payload's kind afterwards.
    pub fn update_payload<R>(&self, f: impl FnOnce(&mut GeoResourceKind) -> R) -> R {
        let (result, kind) = {
            let mut resource = self.inner.resource.write();
            let result = f(resource.payload_mut());
            (result, resource.kind())
        };
        (self.inner.on_change)(Field::Payload, &FieldValue::Kind(kind));
        result
    }

    /// Register the FUTURE resolve callback. No-op for other kinds.
    ///
    /// Callback slots are not fields; registering one reports no change.
    pub fn on_resolve<F>(&self, callback: F) -> bool
    where
        F: Fn(&GeoResource, &GeoResource) + Send + Sync + 'static,
    {
        match self.inner.resource.write().as_future_mut() {
            Some(future) => {
                future.on_resolve(callback);
                true
            }
            None => false,
        }
    }

    /// Register the FUTURE reject callback. No-op for other kinds.
    pub fn on_reject<F>(&self, callback: F) -> bool
    where
        F: Fn(&GeoResource) + Send + Sync + 'static,
    {
        match self.inner.resource.write().as_future_mut() {
            Some(future) => {
                future.on_reject(callback);
                true
            }
            None => false,
        }
    }

    /// Run a FUTURE's loader; see [`GeoResource::get`].
    ///
    /// Works on a snapshot, so no lock is held while the loader runs.
    pub async fn get(&self) -> Result<GeoResource, LoaderError> {
        let snapshot = self.snapshot();
        snapshot.get().await
    }

    /// Load VECTOR data; see [`GeoResource::load_vector`].
    ///
    /// When this call ran the loader, a label found in the data replaces the
    /// current label through [`set_label`](Self::set_label), so observers see
    /// the rename. Memoized loads leave the label alone.
    pub async fn load_vector(&self) -> Result<Option<VectorData>, LoaderError> {
        let snapshot = self.snapshot();
        let (data, ran) = snapshot.load_vector_reporting().await?;
        if ran {
            if let Some(label) = data.as_ref().and_then(|d| d.label.as_deref()) {
                if label != self.label() {
                    self.set_label(label);
                }
            }
        }
        Ok(data)
    }
}

impl fmt::Debug for ObservableGeoResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableGeoResource")
            .field("resource", &*self.inner.resource.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{VectorSourceType, WmsResource};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    type Recorded = Arc<Mutex<Vec<(Field, FieldValue)>>>;

    fn recorder() -> (ChangeCallback, Recorded) {
        let changes: Recorded = Arc::new(Mutex::new(Vec::new()));
        let sink = changes.clone();
        let callback: ChangeCallback = Arc::new(move |field: Field, value: &FieldValue| {
            sink.lock().push((field, value.clone()));
        });
        (callback, changes)
    }

    fn wmts() -> GeoResource {
        GeoResource::wmts("tpo", "TopPlus", "https://tiles/{z}/{x}/{y}").unwrap()
    }

    #[test]
    fn test_wrap_exposes_same_identity() {
        let (callback, _) = recorder();
        let handle = wrap(wmts(), callback);

        assert_eq!(handle.id(), "tpo");
        assert_eq!(handle.kind(), GeoResourceType::Wmts);
        assert_eq!(handle.label(), "TopPlus");
    }

    #[test]
    fn test_set_label_notifies_once_with_new_value() {
        let (callback, changes) = recorder();
        let handle = wrap(wmts(), callback);

        handle.set_label("TopPlus Farbe");

        assert_eq!(handle.label(), "TopPlus Farbe");
        assert_eq!(
            *changes.lock(),
            vec![(Field::Label, FieldValue::Text("TopPlus Farbe".to_string()))]
        );
    }

    #[test]
    fn test_every_mutator_notifies() {
        let (callback, changes) = recorder();
        let handle = wrap(wmts(), callback);

        handle.set_background(true);
        handle.set_opacity(2.0);
        handle.set_min_zoom(Some(3));
        handle.set_max_zoom(None);
        handle.set_hidden(true);
        handle.set_attribution(Some("© BKG".into()));
        handle.set_attribution_resolver(None);
        handle.set_queryable(false);
        handle.set_exportable(false);
        handle.set_auth_roles(vec!["ADMIN".to_string()]);

        let fields: Vec<Field> = changes.lock().iter().map(|(f, _)| *f).collect();
        assert_eq!(
            fields,
            vec![
                Field::Background,
                Field::Opacity,
                Field::MinZoom,
                Field::MaxZoom,
                Field::Hidden,
                Field::Attribution,
                Field::AttributionResolver,
                Field::Queryable,
                Field::Exportable,
                Field::AuthRoles,
            ]
        );
        assert_eq!(changes.lock()[1].1, FieldValue::Number(1.0));
        assert!(handle.with(|r| r.is_background() && r.is_hidden()));
    }

    #[test]
    fn test_wrapping_a_handle_returns_same_handle() {
        let (first, first_changes) = recorder();
        let (second, second_changes) = recorder();

        let handle = wrap(wmts(), first);
        let rewrapped = wrap(handle.clone(), second);
        rewrapped.set_label("changed");

        assert!(rewrapped.ptr_eq(&handle));
        assert_eq!(first_changes.lock().len(), 1);
        assert!(second_changes.lock().is_empty());
    }

    #[test]
    fn test_snapshot_mutation_is_not_observed() {
        let (callback, changes) = recorder();
        let handle = wrap(wmts(), callback);

        let mut copy = handle.snapshot();
        copy.set_label("detached");

        assert_eq!(handle.label(), "TopPlus");
        assert!(changes.lock().is_empty());
    }

    #[test]
    fn test_callback_may_read_handle() {
        let seen = Arc::new(Mutex::new(None));
        let slot: Arc<Mutex<Option<ObservableGeoResource>>> = Arc::new(Mutex::new(None));
        let (sink, handle_slot) = (seen.clone(), slot.clone());

        let handle = wrap(
            wmts(),
            Arc::new(move |_field: Field, _value: &FieldValue| {
                if let Some(h) = handle_slot.lock().as_ref() {
                    *sink.lock() = Some(h.label());
                }
            }),
        );
        *slot.lock() = Some(handle.clone());

        handle.set_label("read back");

        assert_eq!(seen.lock().as_deref(), Some("read back"));
    }

    #[test]
    fn test_update_payload_reports_kind() {
        let (callback, changes) = recorder();
        let handle = wrap(
            GeoResource::new("wms", "WMS", WmsResource::new("https://wms", "a", "image/png"))
                .unwrap(),
            callback,
        );

        let replaced = handle.update_payload(|payload| {
            if let GeoResourceKind::Wms(wms) = payload {
                *wms = wms.clone().with_extra_param("DPI", "96");
                true
            } else {
                false
            }
        });

        assert!(replaced);
        assert_eq!(
            *changes.lock(),
            vec![(Field::Payload, FieldValue::Kind(GeoResourceType::Wms))]
        );
        assert!(handle.with(|r| r.as_wms().unwrap().extra_params().contains_key("DPI")));
    }

    #[tokio::test]
    async fn test_future_callbacks_through_handle() {
        let (callback, changes) = recorder();
        let resolved = Arc::new(AtomicUsize::new(0));
        let counter = resolved.clone();

        let handle = wrap(
            GeoResource::future("f", |id| async move {
                GeoResource::wmts(id, "Resolved", "https://t").map_err(LoaderError::from)
            })
            .unwrap(),
            callback,
        );
        assert!(handle.on_resolve(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let result = handle.get().await.unwrap();

        assert_eq!(result.kind(), GeoResourceType::Wmts);
        assert_eq!(resolved.load(Ordering::SeqCst), 1);
        assert!(changes.lock().is_empty());
        assert_eq!(handle.kind(), GeoResourceType::Future);
    }

    #[test]
    fn test_callback_registration_on_concrete_kind_is_rejected() {
        let (callback, _) = recorder();
        let handle = wrap(wmts(), callback);
        assert!(!handle.on_resolve(|_, _| {}));
        assert!(!handle.on_reject(|_| {}));
    }

    #[tokio::test]
    async fn test_load_vector_applies_label() {
        let (callback, changes) = recorder();
        let resource = GeoResource::vector("kml", "Import", VectorSourceType::Kml).unwrap();
        let handle = wrap(resource, callback);
        handle.update_payload(|payload| {
            if let GeoResourceKind::Vector(vector) = payload {
                vector.set_loader(|_id| async {
                    Ok(VectorData::new("<kml/>", 4326).with_label("Wanderweg"))
                });
            }
        });
        changes.lock().clear();

        let data = handle.load_vector().await.unwrap().unwrap();

        assert_eq!(data.data, "<kml/>");
        assert_eq!(handle.label(), "Wanderweg");
        assert_eq!(
            *changes.lock(),
            vec![(Field::Label, FieldValue::Text("Wanderweg".to_string()))]
        );
    }

    #[tokio::test]
    async fn test_memoized_load_keeps_user_label() {
        let (callback, changes) = recorder();
        let resource = GeoResource::vector("kml", "Import", VectorSourceType::Kml).unwrap();
        let handle = wrap(resource, callback);
        handle.update_payload(|payload| {
            if let GeoResourceKind::Vector(vector) = payload {
                vector.set_loader(|_id| async {
                    Ok(VectorData::new("<kml/>", 4326).with_label("Wanderweg"))
                });
            }
        });
        handle.load_vector().await.unwrap();
        handle.set_label("My trip");
        changes.lock().clear();

        let data = handle.load_vector().await.unwrap().unwrap();

        assert_eq!(data.label.as_deref(), Some("Wanderweg"));
        assert_eq!(handle.label(), "My trip");
        assert!(changes.lock().is_empty());
    }

    #[test]
    fn test_handle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ObservableGeoResource>();
    }
}
