//! The GeoResource registry.
//!
//! [`GeoResourceRegistry`] is the in-memory catalog of every GeoResource the
//! client can render. It is populated once by [`init`](GeoResourceRegistry::init)
//! from a bulk provider, grows lazily through
//! [`resolve_by_id`](GeoResourceRegistry::resolve_by_id), and hands out
//! [`ObservableGeoResource`](crate::observable::ObservableGeoResource) handles
//! whose tracked field changes are reported to a [`ChangeListener`].
//!
//! # Lifecycle of an unknown id
//!
//! ```text
//! NotRegistered --resolve_by_id--> PendingFuture --get() ok--> Resolved (caller re-registers)
//!                                                \--get() err--> Rejected (cache unchanged)
//! ```
//!
//! # Example
//!
//! ```
//! use georesource::registry::{GeoResourceRegistry, FallbackSet};
//! use georesource::provider::BulkProvider;
//! use georesource::model::GeoResource;
//! use georesource::error::LoaderError;
//! use std::sync::Arc;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let provider: Arc<dyn BulkProvider> = Arc::new(|| async {
//!     Ok::<_, LoaderError>(vec![GeoResource::wmts("tpo", "TopPlus", "https://t").unwrap()])
//! });
//! let registry = GeoResourceRegistry::builder(provider).build();
//!
//! let all = registry.init().await;
//! assert_eq!(all.len(), 1);
//!
//! let tpo = registry.by_id("tpo").unwrap();
//! tpo.set_label("TopPlus Farbe");
//! assert_eq!(registry.by_id("tpo").unwrap().label(), "TopPlus Farbe");
//! # });
//! ```

mod builder;
mod events;
mod fallback;
mod service;

pub use builder::GeoResourceRegistryBuilder;
pub use events::{
    BroadcastListener, ChangeListener, GeoResourceChanged, NoOpListener, RegistryChange,
    DEFAULT_EVENT_CAPACITY,
};
pub use fallback::{
    FallbackSet, BASEMAP_VECTOR_ID, BASEMAP_VECTOR_RELIEF_ID, TOPPLUS_ID, TOPPLUS_MONO_ID,
};
pub use service::GeoResourceRegistry;
