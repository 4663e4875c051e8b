//! Change events published by the registry.

use crate::model::GeoResourceType;
use crate::observable::{Field, FieldValue};
use tokio::sync::broadcast;

/// Default capacity of a [`BroadcastListener`] channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// What happened to a registered GeoResource.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryChange {
    /// The resource was added, or replaced an entry with the same id.
    Registered {
        kind: GeoResourceType,
        replaced: bool,
    },
    /// A tracked field of the resource changed.
    FieldChanged { field: Field, value: FieldValue },
}

/// Event delivered to a [`ChangeListener`].
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResourceChanged {
    pub id: String,
    pub change: RegistryChange,
}

impl GeoResourceChanged {
    pub fn registered(id: impl Into<String>, kind: GeoResourceType, replaced: bool) -> Self {
        Self {
            id: id.into(),
            change: RegistryChange::Registered { kind, replaced },
        }
    }

    pub fn field_changed(id: impl Into<String>, field: Field, value: FieldValue) -> Self {
        Self {
            id: id.into(),
            change: RegistryChange::FieldChanged { field, value },
        }
    }

    /// True if the event reports a (re-)registration.
    pub fn is_registration(&self) -> bool {
        matches!(self.change, RegistryChange::Registered { .. })
    }
}

/// Receives registry change events.
///
/// Called synchronously on the thread that made the change, with no registry
/// or entity lock held. Closures `Fn(&GeoResourceChanged)` implement this
/// trait.
pub trait ChangeListener: Send + Sync {
    fn on_change(&self, event: &GeoResourceChanged);
}

impl<F> ChangeListener for F
where
    F: Fn(&GeoResourceChanged) + Send + Sync,
{
    fn on_change(&self, event: &GeoResourceChanged) {
        self(event)
    }
}

/// Listener that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpListener;

impl ChangeListener for NoOpListener {
    fn on_change(&self, _event: &GeoResourceChanged) {}
}

/// Listener fanning events out to any number of async subscribers.
///
/// Events sent while nobody is subscribed are dropped; slow subscribers
/// see `RecvError::Lagged` once they fall `capacity` events behind.
#[derive(Debug, Clone)]
pub struct BroadcastListener {
    sender: broadcast::Sender<GeoResourceChanged>,
}

impl BroadcastListener {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GeoResourceChanged> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for BroadcastListener {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl ChangeListener for BroadcastListener {
    fn on_change(&self, event: &GeoResourceChanged) {
        // No subscribers is fine
        let _ = self.sender.send(event.clone());
    }
}
