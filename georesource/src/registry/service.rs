//! Registry service.

use super::builder::GeoResourceRegistryBuilder;
use super::events::{ChangeListener, GeoResourceChanged};
use super::fallback::FallbackSet;
use crate::config::{Environment, RegistryConfig};
use crate::log::Logger;
use crate::observable::{wrap, ChangeCallback, Field, FieldValue, ObservableGeoResource, Observe};
use crate::provider::{BackendClient, BulkProvider};
use crate::strategy::StrategyChain;
use crate::{log_debug, log_error, log_info, log_warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Default)]
struct RegistryState {
    initialized: bool,
    entries: Vec<ObservableGeoResource>,
}

/// In-memory catalog of GeoResources.
///
/// `Send + Sync`; share it behind an `Arc`. No lock is held across an
/// `.await` or while a listener or entity callback runs.
pub struct GeoResourceRegistry {
    provider: Arc<dyn BulkProvider>,
    strategies: StrategyChain,
    environment: Arc<dyn Environment>,
    fallback: FallbackSet,
    listener: Arc<dyn ChangeListener>,
    tracked_fields: Arc<[Field]>,
    logger: Arc<dyn Logger>,
    state: RwLock<RegistryState>,
}

impl GeoResourceRegistry {
    /// Start building a registry around `provider`.
    pub fn builder(provider: Arc<dyn BulkProvider>) -> GeoResourceRegistryBuilder {
        GeoResourceRegistryBuilder::new(provider)
    }

    /// Start building a registry served by `client`, with the default
    /// strategy chain; see [`GeoResourceRegistryBuilder::for_backend`].
    pub fn for_backend(client: Arc<dyn BackendClient>) -> GeoResourceRegistryBuilder {
        GeoResourceRegistryBuilder::for_backend(client)
    }

    pub(super) fn from_parts(
        provider: Arc<dyn BulkProvider>,
        strategies: StrategyChain,
        environment: Arc<dyn Environment>,
        fallback: FallbackSet,
        listener: Arc<dyn ChangeListener>,
        config: RegistryConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            provider,
            strategies,
            environment,
            fallback,
            listener,
            tracked_fields: config.tracked_fields().into(),
            logger,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Load the initial catalog.
    ///
    /// The bulk provider runs until one attempt has settled; afterwards the
    /// cached entries are returned. When the provider fails, standalone
    /// hosts get the fallback set and all others an empty catalog. Either
    /// way the registry counts as initialized and this never fails.
    ///
    /// Entries registered through [`add_or_replace`](Self::add_or_replace)
    /// before the load settled are kept: a pre-registered entry whose id the
    /// provider also returned takes that entry's position, the others are
    /// appended in registration order.
    ///
    /// Concurrent first calls may each run the provider; the first one to
    /// settle fills the cache and later ones return it.
    pub async fn init(&self) -> Vec<ObservableGeoResource> {
        if let Some(entries) = self.initialized_entries() {
            return entries;
        }

        let loaded = match self.provider.load().await {
            Ok(resources) => {
                log_info!(self.logger, "Loaded {} GeoResources", resources.len());
                resources
            }
            Err(e) if self.environment.is_standalone() => {
                log_warn!(
                    self.logger,
                    "GeoResources could not be fetched from backend ({}). Using fallback GeoResources",
                    e
                );
                self.fallback.resources().to_vec()
            }
            Err(e) => {
                log_error!(self.logger, "GeoResources could not be fetched from backend: {}", e);
                Vec::new()
            }
        };

        let handles = loaded
            .into_iter()
            .map(|resource| self.observe(resource))
            .collect();
        self.install(handles)
    }

    /// Snapshot of all registered handles in registration order.
    ///
    /// Returns an empty list (and logs a warning) before [`init`](Self::init)
    /// has settled.
    pub fn all(&self) -> Vec<ObservableGeoResource> {
        match self.initialized_entries() {
            Some(entries) => entries,
            None => {
                log_warn!(self.logger, "GeoResourceRegistry not yet initialized");
                Vec::new()
            }
        }
    }

    /// The registered handle for `id`.
    ///
    /// An empty id never matches. Returns `None` (and logs a warning) before
    /// [`init`](Self::init) has settled.
    pub fn by_id(&self, id: &str) -> Option<ObservableGeoResource> {
        if id.is_empty() {
            return None;
        }
        let state = self.state.read();
        if !state.initialized {
            drop(state);
            log_warn!(self.logger, "GeoResourceRegistry not yet initialized");
            return None;
        }
        state.entries.iter().find(|e| e.id() == id).cloned()
    }

    /// Resolve an id through the strategy chain and register the result.
    ///
    /// The cache is not consulted: the chain runs on every call and the
    /// result replaces any existing entry. The returned handle may wrap a
    /// FUTURE; once that resolves, the caller registers the concrete
    /// resource with [`add_or_replace`](Self::add_or_replace).
    ///
    /// Returns `None` without touching the cache when no strategy matches.
    pub fn resolve_by_id(&self, id: &str) -> Option<ObservableGeoResource> {
        match self.strategies.resolve(id, self.logger.as_ref()) {
            Some(resource) => Some(self.add_or_replace(resource)),
            None => {
                log_debug!(self.logger, "No resolution strategy matched GeoResource '{}'", id);
                None
            }
        }
    }

    /// Register a resource, replacing any entry with the same id in place.
    ///
    /// The returned handle is the one now held by the registry; keep using
    /// it instead of the value passed in. A [`GeoResourceChanged`]
    /// registration event is published for every call.
    pub fn add_or_replace(&self, entity: impl Observe) -> ObservableGeoResource {
        let handle = self.observe(entity);

        let replaced = {
            let mut state = self.state.write();
            match state.entries.iter().position(|e| e.id() == handle.id()) {
                Some(index) => {
                    state.entries[index] = handle.clone();
                    true
                }
                None => {
                    state.entries.push(handle.clone());
                    false
                }
            }
        };

        log_debug!(
            self.logger,
            "{} GeoResource '{}' ({})",
            if replaced { "Replaced" } else { "Added" },
            handle.id(),
            handle.kind()
        );
        self.listener.on_change(&GeoResourceChanged::registered(
            handle.id(),
            handle.kind(),
            replaced,
        ));
        handle
    }

    /// Number of registered entries, including those added before `init`.
    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    fn initialized_entries(&self) -> Option<Vec<ObservableGeoResource>> {
        let state = self.state.read();
        state.initialized.then(|| state.entries.clone())
    }

    /// Wrap `entity` with a callback forwarding tracked field changes.
    fn observe(&self, entity: impl Observe) -> ObservableGeoResource {
        let callback = self.change_callback(entity.resource_id());
        wrap(entity, callback)
    }

    fn change_callback(&self, id: &str) -> ChangeCallback {
        let id = id.to_string();
        let listener = Arc::clone(&self.listener);
        let tracked = Arc::clone(&self.tracked_fields);
        Arc::new(move |field: Field, value: &FieldValue| {
            if tracked.contains(&field) {
                listener.on_change(&GeoResourceChanged::field_changed(
                    id.as_str(),
                    field,
                    value.clone(),
                ));
            }
        })
    }

    /// Store the result of a settled bulk load, unless another load won.
    fn install(&self, loaded: Vec<ObservableGeoResource>) -> Vec<ObservableGeoResource> {
        let mut state = self.state.write();
        if state.initialized {
            log_debug!(self.logger, "GeoResourceRegistry already initialized, discarding load");
            return state.entries.clone();
        }

        let registered = std::mem::take(&mut state.entries);
        state.entries = merge_entries(loaded, registered);
        state.initialized = true;
        state.entries.clone()
    }
}

/// Merge bulk-loaded entries with entries registered before the load.
///
/// Bulk order is kept, a duplicate id replaces the earlier entry in place,
/// and registered entries win over bulk entries with the same id.
fn merge_entries(
    loaded: Vec<ObservableGeoResource>,
    registered: Vec<ObservableGeoResource>,
) -> Vec<ObservableGeoResource> {
    let mut merged: Vec<ObservableGeoResource> = Vec::with_capacity(loaded.len() + registered.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for entry in loaded.into_iter().chain(registered) {
        match positions.get(entry.id()) {
            Some(&index) => merged[index] = entry,
            None => {
                positions.insert(entry.id().to_string(), merged.len());
                merged.push(entry);
            }
        }
    }
    merged
}

impl fmt::Debug for GeoResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("GeoResourceRegistry")
            .field("initialized", &state.initialized)
            .field("entries", &state.entries.len())
            .field("strategies", &self.strategies)
            .field("tracked_fields", &self.tracked_fields)
            .finish_non_exhaustive()
    }
}
